// tests/common/mod.rs
// Shared stub provider for the pool/signal/query tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sector_news_signals::config::PoolParams;
use sector_news_signals::{NewsError, NewsProvider, NewsSource, RawArticle};

/// 2024-01-15T01:30:00Z
pub const NOW: i64 = 1_705_282_200_000;
pub const HOUR: i64 = 3_600_000;

pub struct StubProvider {
    source: NewsSource,
    articles: Vec<RawArticle>,
    delay: Option<Duration>,
    fail: bool,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(source: NewsSource, articles: Vec<RawArticle>) -> Self {
        Self {
            source,
            articles,
            delay: None,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(source: NewsSource) -> Self {
        Self {
            fail: true,
            ..Self::new(source, Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsProvider for StubProvider {
    fn source(&self) -> NewsSource {
        self.source
    }

    async fn fetch(&self, _query: &str, cap: usize) -> Result<Vec<RawArticle>, NewsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        if self.fail {
            return Err(NewsError::ApiError {
                status: 500,
                message: "stub failure".into(),
            });
        }
        Ok(self.articles.iter().take(cap).cloned().collect())
    }
}

pub fn rfc3339(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .expect("valid timestamp")
        .to_rfc3339()
}

/// Article published `age_ms` before [`NOW`].
pub fn article(title: &str, age_ms: i64) -> RawArticle {
    RawArticle {
        title: title.into(),
        description: String::new(),
        published_at_raw: Some(rfc3339(NOW - age_ms)),
    }
}

pub fn pool_params(keywords: &[&str]) -> PoolParams {
    PoolParams {
        general_keywords: keywords.iter().map(|k| k.to_string()).collect(),
        ..PoolParams::default()
    }
}

pub fn shared(p: StubProvider) -> Arc<StubProvider> {
    Arc::new(p)
}

pub fn providers(list: &[&Arc<StubProvider>]) -> Vec<Arc<dyn NewsProvider>> {
    list.iter()
        .map(|p| Arc::clone(p) as Arc<dyn NewsProvider>)
        .collect()
}
