// src/signals.rs
//! Topic matcher and signal builder.
//!
//! One shared pool fetch per batch of topics. Every pool item is normalized
//! once, then each topic's keyword set is matched against it. A matched item
//! carries `recency * density * core` weight, which feeds the weighted
//! sentiment, the volume score and the issue-type ranking.

use std::collections::HashMap;

use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::analyze::issues::IssueClassifier;
use crate::analyze::keywords::KeywordSet;
use crate::analyze::matching::count_keyword_hits;
use crate::config::NewsSettings;
use crate::ingest::pool::NewsPool;
use crate::ingest::types::{NewsItem, NewsSource, NormalizedNewsItem};
use crate::metrics::{ensure_metrics_described, SIGNALS_TOPICS_TOTAL};
use crate::sentiment::SentimentLexicon;

/// Base of the composite score; sentiment x volume can only lift it.
pub const COMPOSITE_BASE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicCategory {
    Sector,
    Theme,
}

/// A sector or theme group to score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default = "default_category")]
    pub category: TopicCategory,
    #[serde(default, alias = "newsKeywords")]
    pub aliases: Vec<String>,
    /// Constituent names (e.g. stocks); matching only these is penalized.
    #[serde(default)]
    pub entity_names: Vec<String>,
}

fn default_category() -> TopicCategory {
    TopicCategory::Sector
}

impl Topic {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: TopicCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            market: None,
            category,
            aliases: Vec::new(),
            entity_names: Vec::new(),
        }
    }
}

impl std::fmt::Display for TopicCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TopicCategory::Sector => "sector",
            TopicCategory::Theme => "theme",
        })
    }
}

/// One topic per configured theme, ordered by name.
///
/// Ids read `{market}-{category}-{name}` in lowercase with whitespace runs
/// turned into `-`, e.g. `kospi-theme-생성형-ai`.
pub fn topics_from_themes(
    settings: &NewsSettings,
    market: &str,
    category: TopicCategory,
) -> Vec<Topic> {
    let mut names: Vec<&String> = settings.themes.keys().collect();
    names.sort();
    let market_slug = market.trim().to_lowercase();
    names
        .into_iter()
        .map(|name| {
            let slug = name
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-");
            let id = format!("{market_slug}-{category}-{slug}");
            let mut topic = Topic::new(id, name.clone(), category);
            topic.market = Some(market.trim().to_string());
            topic
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSignal {
    pub query: String,
    pub total_count: usize,
    pub volume_score: f64,
    pub sentiment_score: f64,
    pub score: f64,
    pub sources: Vec<NewsSource>,
    #[serde(default)]
    pub issue_types: Vec<String>,
}

/// Full and core keyword sets of one topic.
#[derive(Debug, Clone)]
pub struct TopicKeywords {
    pub full: KeywordSet,
    /// Same as `full` minus entity names.
    pub core: KeywordSet,
}

/// 0 for unknown dates, 1 for items from the future, then linear decay over
/// the lookback window with a floor.
pub fn recency_weight(published_at: i64, now_ms: i64, lookback_ms: i64, floor: f64) -> f64 {
    if published_at == 0 {
        return 0.0;
    }
    let age = now_ms - published_at;
    if age <= 0 {
        return 1.0;
    }
    let ratio = 1.0 - age as f64 / lookback_ms.max(1) as f64;
    ratio.clamp(floor, 1.0)
}

/// Matched weight relative to a fixed share of the pool's total weight.
pub fn volume_score(match_weight: f64, total_weight: f64, base_ratio: f64) -> f64 {
    (match_weight / (total_weight.max(1.0) * base_ratio)).clamp(0.0, 1.0)
}

/// `0.5 + 0.5 * sentiment * volume`, in [0, 1].
pub fn composite_score(sentiment: f64, volume: f64) -> f64 {
    (COMPOSITE_BASE + COMPOSITE_BASE * sentiment * volume).clamp(0.0, 1.0)
}

struct MatchedItem<'a> {
    text: &'a str,
    source: NewsSource,
    weight: f64,
    issue_types: Vec<String>,
}

pub struct SignalEngine {
    settings: NewsSettings,
    classifier: IssueClassifier,
    lexicon: SentimentLexicon,
}

impl SignalEngine {
    pub fn from_settings(settings: &NewsSettings) -> Self {
        Self {
            settings: settings.clone(),
            classifier: IssueClassifier::new(
                &settings.issues,
                &settings.fallback_issue,
                &settings.keywords,
            ),
            lexicon: SentimentLexicon::new(&settings.lexicon, settings.scoring.neutral_score),
        }
    }

    pub fn topic_keywords(&self, topic: &Topic) -> TopicKeywords {
        let core_labels: Vec<&str> = std::iter::once(topic.name.as_str())
            .chain(self.settings.theme_aliases(&topic.name).iter().map(String::as_str))
            .chain(topic.aliases.iter().map(String::as_str))
            .collect();
        let full_labels = core_labels
            .iter()
            .copied()
            .chain(topic.entity_names.iter().map(String::as_str));
        let rules = &self.settings.keywords;
        TopicKeywords {
            full: KeywordSet::build(full_labels, rules),
            core: KeywordSet::build(&core_labels, rules),
        }
    }

    /// Fetch the shared pool once and score every topic against it.
    pub async fn build_news_signals(
        &self,
        pool: &NewsPool,
        topics: &[Topic],
    ) -> HashMap<String, NewsSignal> {
        if topics.is_empty() || !pool.has_providers() {
            return HashMap::new();
        }
        let items = pool.fetch_all().await;
        if items.is_empty() {
            tracing::info!(target: "signals", topics = topics.len(), "news pool empty");
            return HashMap::new();
        }
        self.score_items(&items, topics, pool.now_ms())
    }

    /// Score `topics` against an already fetched pool as of `now_ms`.
    pub fn score_items(
        &self,
        items: &[NewsItem],
        topics: &[Topic],
        now_ms: i64,
    ) -> HashMap<String, NewsSignal> {
        ensure_metrics_described();
        let mut signals = HashMap::new();
        if items.is_empty() || topics.is_empty() {
            return signals;
        }

        let floor = self.settings.scoring.recency_min_weight;
        let lookback_ms = self.settings.pool.lookback_ms();
        let normalized: Vec<(NormalizedNewsItem<'_>, f64)> = items
            .iter()
            .map(|item| {
                let recency = recency_weight(item.published_at, now_ms, lookback_ms, floor);
                (NormalizedNewsItem::new(item), recency)
            })
            .collect();
        let total_weight: f64 = normalized.iter().map(|(_, r)| r).sum();

        for topic in topics {
            let keywords = self.topic_keywords(topic);
            if keywords.full.is_empty() {
                tracing::debug!(target: "signals", topic = %topic.id, "no usable keywords");
                continue;
            }
            let matched: Vec<MatchedItem<'_>> = normalized
                .iter()
                .filter_map(|(news, recency)| self.match_item(news, *recency, &keywords))
                .collect();
            if matched.is_empty() {
                continue;
            }
            let signal = self.aggregate(topic, &matched, total_weight);
            tracing::debug!(
                target: "signals",
                topic = %topic.id,
                matched = signal.total_count,
                score = signal.score,
                "topic scored"
            );
            signals.insert(topic.id.clone(), signal);
        }

        counter!(SIGNALS_TOPICS_TOTAL).increment(signals.len() as u64);
        tracing::info!(
            target: "signals",
            pool = items.len(),
            topics = topics.len(),
            signals = signals.len(),
            total_weight,
            "news signals built"
        );
        signals
    }

    fn match_item<'a>(
        &self,
        news: &'a NormalizedNewsItem<'_>,
        recency: f64,
        keywords: &TopicKeywords,
    ) -> Option<MatchedItem<'a>> {
        let hits = count_keyword_hits(&news.text, &news.compact_text, keywords.full.iter());
        if hits == 0 || recency == 0.0 {
            return None;
        }
        let core_hit = keywords.core.is_empty()
            || count_keyword_hits(&news.text, &news.compact_text, keywords.core.iter()) > 0;
        let s = &self.settings.scoring;
        let density = (s.density_base_weight + s.density_step * hits as f64)
            .clamp(s.density_base_weight, s.density_max_weight);
        let core = if core_hit { 1.0 } else { s.core_match_penalty };
        Some(MatchedItem {
            text: &news.text,
            source: news.item.source,
            weight: recency * density * core,
            issue_types: self.classifier.classify(&news.text, &news.compact_text),
        })
    }

    fn aggregate(
        &self,
        topic: &Topic,
        matched: &[MatchedItem<'_>],
        total_weight: f64,
    ) -> NewsSignal {
        let sentiment = self
            .lexicon
            .score_weighted(matched.iter().map(|m| (m.text, m.weight)));
        let match_weight: f64 = matched.iter().map(|m| m.weight).sum();
        let scoring = &self.settings.scoring;
        let volume = volume_score(match_weight, total_weight, scoring.volume_base_ratio);

        let mut sources: Vec<NewsSource> = Vec::new();
        for m in matched {
            if !sources.contains(&m.source) {
                sources.push(m.source);
            }
        }

        // First-seen order breaks ties (stable sort).
        let mut issue_weights: Vec<(&str, f64)> = Vec::new();
        for m in matched {
            for issue in &m.issue_types {
                match issue_weights.iter_mut().find(|(name, _)| *name == issue.as_str()) {
                    Some((_, w)) => *w += m.weight,
                    None => issue_weights.push((issue.as_str(), m.weight)),
                }
            }
        }
        issue_weights.sort_by(|a, b| b.1.total_cmp(&a.1));
        let issue_types = issue_weights
            .into_iter()
            .take(scoring.max_issue_types)
            .map(|(name, _)| name.to_string())
            .collect();

        NewsSignal {
            query: topic.name.clone(),
            total_count: matched.len(),
            volume_score: volume,
            sentiment_score: sentiment,
            score: composite_score(sentiment, volume),
            sources,
            issue_types,
        }
    }
}
