//! Metric names and their one-time registration.
//!
//! The library only emits through the `metrics` facade; installing a recorder
//! (Prometheus or otherwise) is up to the embedding process.

use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

pub const POOL_FETCH_TOTAL: &str = "news_pool_fetch_total";
pub const POOL_CACHE_HITS_TOTAL: &str = "news_pool_cache_hits_total";
pub const POOL_SINGLEFLIGHT_JOINS_TOTAL: &str = "news_pool_singleflight_joins_total";
pub const PROVIDER_ERRORS_TOTAL: &str = "news_provider_errors_total";
pub const POOL_ITEMS: &str = "news_pool_items";
pub const POOL_FETCH_MS: &str = "news_pool_fetch_ms";
pub const SIGNALS_TOPICS_TOTAL: &str = "news_signals_topics_total";

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(POOL_FETCH_TOTAL, "Uncached news pool refreshes.");
        describe_counter!(
            POOL_CACHE_HITS_TOTAL,
            "News pool requests served from a fresh cache entry."
        );
        describe_counter!(
            POOL_SINGLEFLIGHT_JOINS_TOTAL,
            "News pool requests that joined an in-flight refresh."
        );
        describe_counter!(
            PROVIDER_ERRORS_TOTAL,
            "Provider fetch/parse errors and timeouts."
        );
        describe_gauge!(POOL_ITEMS, "Items in the last refreshed news pool.");
        describe_histogram!(POOL_FETCH_MS, "News pool refresh time in milliseconds.");
        describe_counter!(
            SIGNALS_TOPICS_TOTAL,
            "Topics that produced a news signal."
        );
    });
}
