// src/query.rs
//! Ad-hoc single-query signal: one search per enabled provider, no pool, no
//! cache, no topic matching. Volume is the share of the per-source cap that
//! came back.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{NewsSettings, PoolParams};
use crate::ingest::types::{NewsProvider, NewsSource};
use crate::ingest::{fetch_isolated, map_in_batches};
use crate::sentiment::SentimentLexicon;
use crate::signals::{composite_score, NewsSignal, Topic, TopicCategory};

const THEME_SUFFIX: &str = "테마";
const SECTOR_SUFFIX: &str = "섹터";

/// `"{name} 테마"` / `"{name} 섹터"`, cut to `max_chars` characters.
pub fn build_news_query(topic: &Topic, max_chars: usize) -> String {
    let suffix = match topic.category {
        TopicCategory::Theme => THEME_SUFFIX,
        TopicCategory::Sector => SECTOR_SUFFIX,
    };
    format!("{} {}", topic.name, suffix)
        .chars()
        .take(max_chars)
        .collect()
}

/// What one provider contributed to a single-query signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSignal {
    pub source: NewsSource,
    pub count: usize,
    pub sentiment: f64,
}

pub struct QueryClient {
    providers: Vec<Arc<dyn NewsProvider>>,
    params: PoolParams,
    query_max_chars: usize,
    lexicon: SentimentLexicon,
}

impl QueryClient {
    pub fn new(providers: Vec<Arc<dyn NewsProvider>>, settings: &NewsSettings) -> Self {
        Self {
            providers,
            params: settings.pool.clone(),
            query_max_chars: settings.scoring.query_max_chars,
            lexicon: SentimentLexicon::new(&settings.lexicon, settings.scoring.neutral_score),
        }
    }

    /// Per-provider counts and unweighted sentiment; failed providers are left out.
    pub async fn provider_signals(&self, query: &str) -> Vec<ProviderSignal> {
        let cap = self.params.query_items_per_source;
        let timeout = self.params.timeout();
        let calls = self
            .providers
            .iter()
            .map(|p| fetch_isolated(p.clone(), query.to_string(), cap, timeout));
        futures::future::join_all(calls)
            .await
            .into_iter()
            .zip(&self.providers)
            .filter_map(|(res, provider)| {
                let items = res?;
                let texts: Vec<String> = items
                    .iter()
                    .map(|it| format!("{} {}", it.title, it.description))
                    .collect();
                Some(ProviderSignal {
                    source: provider.source(),
                    count: texts.len(),
                    sentiment: self.lexicon.score_texts(&texts),
                })
            })
            .collect()
    }

    pub async fn fetch_news_signal(&self, query: &str) -> Option<NewsSignal> {
        if self.providers.is_empty() {
            return None;
        }
        let results = self.provider_signals(query).await;
        let signal = aggregate_provider_signals(query, &results, self.params.query_items_per_source);
        tracing::debug!(
            target: "query",
            %query,
            providers = results.len(),
            total = signal.as_ref().map_or(0, |s| s.total_count),
            "single-query signal"
        );
        signal
    }

    /// Single-query signals for many topics, `concurrency` topics at a time.
    /// Topics without a signal are absent from the map.
    pub async fn fetch_news_signals_batch(&self, topics: &[Topic]) -> HashMap<String, NewsSignal> {
        if topics.is_empty() || self.providers.is_empty() {
            return HashMap::new();
        }
        let max_chars = self.query_max_chars;
        let results = map_in_batches(topics.iter().collect(), self.params.concurrency, |topic| async move {
            let query = build_news_query(topic, max_chars);
            (topic.id.clone(), self.fetch_news_signal(&query).await)
        })
        .await;
        results
            .into_iter()
            .filter_map(|(id, signal)| signal.map(|s| (id, s)))
            .collect()
    }
}

/// Count-weighted sentiment, volume against `cap` per answering provider.
/// `None` when nothing answered or nothing was found.
pub fn aggregate_provider_signals(
    query: &str,
    results: &[ProviderSignal],
    cap: usize,
) -> Option<NewsSignal> {
    if results.is_empty() {
        return None;
    }
    let total: usize = results.iter().map(|r| r.count).sum();
    if total == 0 {
        return None;
    }
    let sentiment = results
        .iter()
        .map(|r| r.sentiment * r.count as f64)
        .sum::<f64>()
        / total as f64;
    let denominator = (cap.max(1) * results.len()) as f64;
    let volume = (total as f64 / denominator).clamp(0.0, 1.0);
    Some(NewsSignal {
        query: query.to_string(),
        total_count: total,
        volume_score: volume,
        sentiment_score: sentiment,
        score: composite_score(sentiment, volume),
        sources: results.iter().map(|r| r.source).collect(),
        issue_types: Vec::new(),
    })
}
