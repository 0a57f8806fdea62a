// src/ingest/pool.rs
//! Shared news pool: every (general keyword x provider) search merged,
//! deduplicated by title and limited to the lookback window.
//!
//! Results are cached per [`PoolKey`] for `cache_ttl_ms` (absolute TTL, no
//! sliding refresh). Concurrent callers that miss the cache share a single
//! refresh: the first one registers an in-flight slot, later ones await it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use tokio::sync::OnceCell;

use crate::clock::{Clock, SystemClock};
use crate::config::PoolParams;
use crate::ingest::types::{NewsItem, NewsProvider, NewsSource};
use crate::ingest::{dedup_by_title, fetch_isolated, map_in_batches, within_lookback};
use crate::metrics::{
    ensure_metrics_described, POOL_CACHE_HITS_TOTAL, POOL_FETCH_MS, POOL_FETCH_TOTAL, POOL_ITEMS,
    POOL_SINGLEFLIGHT_JOINS_TOTAL,
};

/// Identity of one pool refresh.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolKey {
    /// Sorted, unique.
    pub sources: Vec<NewsSource>,
    pub keywords: Vec<String>,
    pub lookback_hours: u64,
    pub items_per_source: usize,
}

#[derive(Debug)]
struct CacheEntry {
    fetched_at: i64,
    items: Arc<Vec<NewsItem>>,
}

type InFlight = Arc<OnceCell<Arc<Vec<NewsItem>>>>;

#[derive(Default)]
struct PoolState {
    entries: HashMap<PoolKey, CacheEntry>,
    in_flight: HashMap<PoolKey, InFlight>,
}

pub struct NewsPool {
    providers: Vec<Arc<dyn NewsProvider>>,
    params: PoolParams,
    clock: Arc<dyn Clock>,
    // Cache and in-flight maps share one lock so check-then-register is atomic.
    state: Mutex<PoolState>,
}

impl NewsPool {
    pub fn new(
        providers: Vec<Arc<dyn NewsProvider>>,
        params: PoolParams,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            providers,
            params,
            clock,
            state: Mutex::new(PoolState::default()),
        }
    }

    pub fn with_system_clock(providers: Vec<Arc<dyn NewsProvider>>, params: PoolParams) -> Self {
        Self::new(providers, params, Arc::new(SystemClock))
    }

    pub fn has_providers(&self) -> bool {
        !self.providers.is_empty()
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn enabled_sources(&self) -> Vec<NewsSource> {
        let mut sources: Vec<NewsSource> = self.providers.iter().map(|p| p.source()).collect();
        sources.sort();
        sources.dedup();
        sources
    }

    pub fn cache_key(&self) -> PoolKey {
        PoolKey {
            sources: self.enabled_sources(),
            keywords: self.params.pool_keywords(),
            lookback_hours: self.params.lookback_hours,
            items_per_source: self.params.items_per_source,
        }
    }

    /// Drop every cached pool; in-flight refreshes still complete.
    pub fn invalidate(&self) {
        self.lock_state().entries.clear();
    }

    /// The current pool, from cache when fresh.
    pub async fn fetch_all(&self) -> Arc<Vec<NewsItem>> {
        if self.providers.is_empty() {
            return Arc::new(Vec::new());
        }
        ensure_metrics_described();

        let key = self.cache_key();
        let slot = {
            let mut state = self.lock_state();
            let now = self.clock.now_ms();
            if let Some(entry) = state.entries.get(&key) {
                if now - entry.fetched_at < self.params.cache_ttl_ms as i64 {
                    counter!(POOL_CACHE_HITS_TOTAL).increment(1);
                    return entry.items.clone();
                }
            }
            match state.in_flight.get(&key) {
                Some(slot) => {
                    counter!(POOL_SINGLEFLIGHT_JOINS_TOTAL).increment(1);
                    tracing::debug!(target: "news_pool", "joining in-flight pool refresh");
                    slot.clone()
                }
                None => {
                    let slot: InFlight = Arc::new(OnceCell::new());
                    state.in_flight.insert(key.clone(), slot.clone());
                    slot
                }
            }
        };

        slot.get_or_init(|| self.refresh(&key, &slot)).await.clone()
    }

    async fn refresh(&self, key: &PoolKey, slot: &InFlight) -> Arc<Vec<NewsItem>> {
        let t0 = Instant::now();
        let tasks: Vec<(Arc<dyn NewsProvider>, String)> = key
            .keywords
            .iter()
            .flat_map(|kw| self.providers.iter().map(move |p| (p.clone(), kw.clone())))
            .collect();
        let task_count = tasks.len();

        let cap = self.params.items_per_source;
        let timeout = self.params.timeout();
        let results = map_in_batches(tasks, self.params.concurrency, |(provider, query)| {
            fetch_isolated(provider, query, cap, timeout)
        })
        .await;

        let failed = results.iter().filter(|r| r.is_none()).count();
        let merged: Vec<NewsItem> = results.into_iter().flatten().flatten().collect();
        let fetched = merged.len();
        let (unique, duplicates) = dedup_by_title(merged);

        let now = self.clock.now_ms();
        let items = Arc::new(within_lookback(unique, now, self.params.lookback_ms()));

        {
            let mut state = self.lock_state();
            state.entries.insert(
                key.clone(),
                CacheEntry {
                    fetched_at: now,
                    items: items.clone(),
                },
            );
            if state
                .in_flight
                .get(key)
                .is_some_and(|current| Arc::ptr_eq(current, slot))
            {
                state.in_flight.remove(key);
            }
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        counter!(POOL_FETCH_TOTAL).increment(1);
        histogram!(POOL_FETCH_MS).record(ms);
        gauge!(POOL_ITEMS).set(items.len() as f64);
        tracing::info!(
            target: "news_pool",
            tasks = task_count,
            failed,
            fetched,
            duplicates,
            kept = items.len(),
            ms,
            "news pool refreshed"
        );

        items
    }

    fn lock_state(&self) -> MutexGuard<'_, PoolState> {
        // The maps stay consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}
