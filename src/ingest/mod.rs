// src/ingest/mod.rs
pub mod pool;
pub mod providers;
pub mod types;

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use metrics::counter;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

use crate::analyze::text::normalize_text;
use crate::error::NewsError;
use crate::ingest::types::{NewsItem, NewsProvider, RawArticle};
use crate::metrics::PROVIDER_ERRORS_TOTAL;

/// Parse a provider timestamp (RFC 3339 or RFC 2822) into epoch milliseconds.
/// Missing or unparseable values become 0.
pub fn parse_published_at(raw: Option<&str>) -> i64 {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0;
    };
    OffsetDateTime::parse(s, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(s, &Rfc2822))
        .ok()
        .and_then(|dt| i64::try_from(dt.unix_timestamp_nanos() / 1_000_000).ok())
        .unwrap_or(0)
}

/// Tag raw provider articles with their source and parsed timestamp.
pub fn to_news_items(provider: &dyn NewsProvider, raw: Vec<RawArticle>) -> Vec<NewsItem> {
    let source = provider.source();
    raw.into_iter()
        .map(|a| NewsItem {
            published_at: parse_published_at(a.published_at_raw.as_deref()),
            title: a.title,
            description: a.description,
            source,
        })
        .collect()
}

/// Keep the first item per normalized title; untitled items are dropped.
/// Returns (kept, removed_count).
pub fn dedup_by_title(items: Vec<NewsItem>) -> (Vec<NewsItem>, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut keep = Vec::with_capacity(items.len());
    let mut removed = 0usize;
    for item in items {
        let key = normalize_text(&item.title);
        if key.is_empty() || !seen.insert(key) {
            removed += 1;
            continue;
        }
        keep.push(item);
    }
    (keep, removed)
}

/// Items published at or after `now_ms - lookback_ms`.
pub fn within_lookback(items: Vec<NewsItem>, now_ms: i64, lookback_ms: i64) -> Vec<NewsItem> {
    let cutoff = now_ms.saturating_sub(lookback_ms);
    items
        .into_iter()
        .filter(|item| item.published_at >= cutoff)
        .collect()
}

/// Run `f` over `items` in fixed-size batches: every batch is awaited in full
/// before the next one starts. Output order follows input order.
pub async fn map_in_batches<T, R, F, Fut>(items: Vec<T>, batch_size: usize, f: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    let batch_size = batch_size.max(1);
    let mut results = Vec::with_capacity(items.len());
    let mut iter = items.into_iter().peekable();
    while iter.peek().is_some() {
        let batch: Vec<Fut> = iter.by_ref().take(batch_size).map(&f).collect();
        results.extend(join_all(batch).await);
    }
    results
}

/// One provider call bounded by `timeout`. Errors and timeouts are logged,
/// counted and reported as `None`.
pub async fn fetch_isolated(
    provider: Arc<dyn NewsProvider>,
    query: String,
    cap: usize,
    timeout: Duration,
) -> Option<Vec<NewsItem>> {
    let outcome = match tokio::time::timeout(timeout, provider.fetch(&query, cap)).await {
        Ok(res) => res,
        Err(_) => Err(NewsError::Timeout(timeout.as_millis() as u64)),
    };
    match outcome {
        Ok(raw) => Some(to_news_items(provider.as_ref(), raw)),
        Err(e) => {
            tracing::warn!(
                target: "providers",
                error = %e,
                provider = provider.source().as_str(),
                %query,
                "provider fetch failed"
            );
            counter!(PROVIDER_ERRORS_TOTAL, "provider" => provider.source().as_str()).increment(1);
            None
        }
    }
}
