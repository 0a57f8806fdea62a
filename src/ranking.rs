// src/ranking.rs
//! Issue ranking over built signals: a topic qualifies with enough matched
//! news and a high enough composite score.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::ScoringParams;
use crate::ingest::types::NewsSource;
use crate::signals::{NewsSignal, Topic, TopicCategory};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedTopic {
    pub id: String,
    pub name: String,
    pub market: Option<String>,
    pub category: TopicCategory,
    /// Composite score on a 0..=100 scale.
    pub issue_score: u32,
    /// Same scale, unclamped.
    pub news_score: i64,
    pub news_count: usize,
    pub sentiment_score: f64,
    pub volume_score: f64,
    pub sources: Vec<NewsSource>,
    pub issue_types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingSummary {
    pub group_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_score: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub groups: Vec<RankedTopic>,
    pub summary: RankingSummary,
    /// Providers that fed the signals.
    pub enabled_sources: Vec<NewsSource>,
}

/// Qualified topics, best issue score first, ties by news count.
pub fn rank_topics(
    topics: &[Topic],
    signals: &HashMap<String, NewsSignal>,
    params: &ScoringParams,
    enabled_sources: &[NewsSource],
) -> Ranking {
    let mut groups: Vec<RankedTopic> = topics
        .iter()
        .filter_map(|topic| {
            let signal = signals.get(&topic.id)?;
            let issue_score = (signal.score.clamp(0.0, 1.0) * 100.0).round() as u32;
            let news_score = (signal.score * 100.0).round() as i64;
            let qualified = signal.total_count >= params.issue_news_count_threshold
                && issue_score >= params.issue_score_threshold;
            if !qualified {
                return None;
            }
            Some(RankedTopic {
                id: topic.id.clone(),
                name: topic.name.clone(),
                market: topic.market.clone(),
                category: topic.category,
                issue_score,
                news_score,
                news_count: signal.total_count,
                sentiment_score: signal.sentiment_score,
                volume_score: signal.volume_score,
                sources: signal.sources.clone(),
                issue_types: signal.issue_types.clone(),
            })
        })
        .collect();

    groups.sort_by(|a, b| {
        b.issue_score
            .cmp(&a.issue_score)
            .then(b.news_count.cmp(&a.news_count))
    });

    let summary = RankingSummary {
        group_count: groups.len(),
        top_group: groups.first().map(|g| g.name.clone()),
        top_score: groups.first().map(|g| g.issue_score),
    };
    Ranking {
        groups,
        summary,
        enabled_sources: enabled_sources.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(score: f64, total_count: usize) -> NewsSignal {
        NewsSignal {
            query: String::new(),
            total_count,
            volume_score: 1.0,
            sentiment_score: 1.0,
            score,
            sources: vec![NewsSource::Naver],
            issue_types: vec!["실적".into()],
        }
    }

    #[test]
    fn thresholds_are_inclusive() {
        let topics = vec![
            Topic::new("a", "A", TopicCategory::Theme),
            Topic::new("b", "B", TopicCategory::Theme),
            Topic::new("c", "C", TopicCategory::Theme),
        ];
        let signals = HashMap::from([
            ("a".to_string(), signal(0.6, 2)),
            ("b".to_string(), signal(0.594, 9)),
            ("c".to_string(), signal(0.9, 1)),
        ]);
        let r = rank_topics(&topics, &signals, &ScoringParams::default(), &[NewsSource::Naver]);
        assert_eq!(r.groups.len(), 1);
        assert_eq!(r.groups[0].id, "a");
        assert_eq!(r.groups[0].issue_score, 60);
    }

    #[test]
    fn sorted_by_score_then_count() {
        let topics = vec![
            Topic::new("a", "A", TopicCategory::Sector),
            Topic::new("b", "B", TopicCategory::Sector),
            Topic::new("c", "C", TopicCategory::Sector),
            Topic::new("d", "D", TopicCategory::Sector),
        ];
        let signals = HashMap::from([
            ("a".to_string(), signal(0.70, 3)),
            ("b".to_string(), signal(0.80, 2)),
            ("c".to_string(), signal(0.70, 5)),
        ]);
        let r = rank_topics(&topics, &signals, &ScoringParams::default(), &[NewsSource::Naver]);
        let ids: Vec<&str> = r.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(r.summary.group_count, 3);
        assert_eq!(r.summary.top_group.as_deref(), Some("B"));
        assert_eq!(r.summary.top_score, Some(80));
    }

    #[test]
    fn empty_summary_omits_top_fields() {
        let r = rank_topics(&[], &HashMap::new(), &ScoringParams::default(), &[]);
        let json = serde_json::to_value(&r.summary).unwrap();
        assert_eq!(json, serde_json::json!({ "groupCount": 0 }));
    }

    #[test]
    fn ranking_reports_enabled_sources() {
        let topics = vec![Topic::new("a", "A", TopicCategory::Theme)];
        let signals = HashMap::from([("a".to_string(), signal(0.7, 2))]);
        let r = rank_topics(
            &topics,
            &signals,
            &ScoringParams::default(),
            &[NewsSource::Naver, NewsSource::NewsApi],
        );
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["enabledSources"], serde_json::json!(["naver", "newsapi"]));
        assert_eq!(json["groups"][0]["issueScore"], 70);
        assert_eq!(json["summary"]["topGroup"], "A");
    }
}
