// src/ingest/types.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analyze::text::{compact_text, normalize_text};
use crate::error::NewsError;

/// News providers known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsSource {
    Naver,
    Daum,
    NewsApi,
}

impl NewsSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsSource::Naver => "naver",
            NewsSource::Daum => "daum",
            NewsSource::NewsApi => "newsapi",
        }
    }
}

impl std::fmt::Display for NewsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Article as returned by a provider adapter, before timestamp parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArticle {
    pub title: String,
    pub description: String,
    pub published_at_raw: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub source: NewsSource,
    /// Unix epoch milliseconds; 0 when the provider date was unparseable.
    pub published_at: i64,
}

/// Pool item with its matching texts derived once per scoring pass.
#[derive(Debug, Clone)]
pub struct NormalizedNewsItem<'a> {
    pub item: &'a NewsItem,
    pub text: String,
    pub compact_text: String,
}

impl<'a> NormalizedNewsItem<'a> {
    pub fn new(item: &'a NewsItem) -> Self {
        let text = normalize_text(&format!("{} {}", item.title, item.description));
        let compact_text = compact_text(&text);
        Self {
            item,
            text,
            compact_text,
        }
    }
}

/// One news vendor behind a uniform search call.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn source(&self) -> NewsSource;

    /// Latest articles for `query`, at most `cap` of them.
    async fn fetch(&self, query: &str, cap: usize) -> Result<Vec<RawArticle>, NewsError>;
}
