// src/config/settings.rs
//! Static tables (theme aliases, issue categories, sentiment lexicon, pool
//! keywords) and the tuning constants of the scoring pipeline.
//!
//! Resolution order:
//! 1) `$NEWS_SETTINGS_PATH` (must exist)
//! 2) `config/news.toml`
//! 3) the copy of `config/news.toml` embedded at build time

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_NEWS_SETTINGS_PATH: &str = "config/news.toml";
pub const ENV_NEWS_SETTINGS_PATH: &str = "NEWS_SETTINGS_PATH";

const EMBEDDED_SETTINGS: &str = include_str!("../../config/news.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct NewsSettings {
    #[serde(default = "default_fallback_issue")]
    pub fallback_issue: String,
    #[serde(default)]
    pub pool: PoolParams,
    #[serde(default)]
    pub scoring: ScoringParams,
    #[serde(default)]
    pub keywords: KeywordRules,
    #[serde(default)]
    pub lexicon: LexiconCfg,
    /// Ordered: classifier output follows this order.
    #[serde(default)]
    pub issues: Vec<IssueCategoryCfg>,
    /// Topic name -> extra alias keywords.
    #[serde(default)]
    pub themes: HashMap<String, Vec<String>>,
}

fn default_fallback_issue() -> String {
    "일반".to_string()
}

/// Pool fan-out and cache parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolParams {
    pub lookback_hours: u64,
    /// Per-source cap for pool refreshes.
    pub items_per_source: usize,
    /// Per-source cap for single-query lookups.
    pub query_items_per_source: usize,
    /// Batch size for provider fan-out.
    pub concurrency: usize,
    pub timeout_ms: u64,
    pub cache_ttl_ms: u64,
    pub general_keywords: Vec<String>,
}

impl Default for PoolParams {
    fn default() -> Self {
        Self {
            lookback_hours: 24,
            items_per_source: 50,
            query_items_per_source: 8,
            concurrency: 3,
            timeout_ms: 4_500,
            cache_ttl_ms: 60_000,
            general_keywords: Vec::new(),
        }
    }
}

impl PoolParams {
    pub fn lookback_ms(&self) -> i64 {
        (self.lookback_hours as i64).saturating_mul(60 * 60 * 1000)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Trimmed, non-empty, first-occurrence-unique general keywords.
    pub fn pool_keywords(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.general_keywords.len());
        for kw in &self.general_keywords {
            let t = kw.trim();
            if !t.is_empty() && !out.iter().any(|k| k == t) {
                out.push(t.to_string());
            }
        }
        out
    }
}

/// Weights and thresholds of the topic matcher and ranking.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    pub recency_min_weight: f64,
    pub core_match_penalty: f64,
    pub density_base_weight: f64,
    pub density_step: f64,
    pub density_max_weight: f64,
    /// Share of the pool's recency-weighted mass that saturates the volume score.
    pub volume_base_ratio: f64,
    pub neutral_score: f64,
    pub max_issue_types: usize,
    pub issue_score_threshold: u32,
    pub issue_news_count_threshold: usize,
    pub query_max_chars: usize,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            recency_min_weight: 0.2,
            core_match_penalty: 0.6,
            density_base_weight: 0.55,
            density_step: 0.08,
            density_max_weight: 1.0,
            volume_base_ratio: 0.08,
            neutral_score: 0.5,
            max_issue_types: 3,
            issue_score_threshold: 60,
            issue_news_count_threshold: 2,
            query_max_chars: 60,
        }
    }
}

/// Filters applied by the keyword expander.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeywordRules {
    pub min_ascii_length: usize,
    pub short_ascii_allowlist: Vec<String>,
    pub ignored: Vec<String>,
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self {
            min_ascii_length: 3,
            short_ascii_allowlist: ["ai", "ev", "k2", "k9", "l2"]
                .into_iter()
                .map(String::from)
                .collect(),
            ignored: ["테마", "섹터", "관련", "관련주", "주식"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LexiconCfg {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueCategoryCfg {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl NewsSettings {
    /// Resolve settings using env var + fallbacks (see module docs).
    pub fn from_toml() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_NEWS_SETTINGS_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!(
                    "{ENV_NEWS_SETTINGS_PATH} points to non-existent path {}",
                    pb.display()
                ));
            }
            return Self::from_path(&pb);
        }
        let default_path = PathBuf::from(DEFAULT_NEWS_SETTINGS_PATH);
        if default_path.exists() {
            return Self::from_path(&default_path);
        }
        Self::embedded()
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading news settings from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing news settings at {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: NewsSettings = toml::from_str(s)?;
        Ok(cfg.sanitized())
    }

    /// Settings compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_SETTINGS).context("parsing embedded news settings")
    }

    /// Theme alias keywords registered for a topic name.
    pub fn theme_aliases(&self, topic_name: &str) -> &[String] {
        self.themes
            .get(topic_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn sanitized(mut self) -> Self {
        self.pool.concurrency = self.pool.concurrency.max(1);
        self.pool.lookback_hours = self.pool.lookback_hours.max(1);
        let s = &mut self.scoring;
        if !(0.0..=1.0).contains(&s.recency_min_weight) {
            s.recency_min_weight = ScoringParams::default().recency_min_weight;
        }
        if !(0.0..=1.0).contains(&s.neutral_score) {
            s.neutral_score = ScoringParams::default().neutral_score;
        }
        if s.density_base_weight > s.density_max_weight {
            // keep a valid clamp interval
            std::mem::swap(&mut s.density_base_weight, &mut s.density_max_weight);
        }
        if s.volume_base_ratio <= 0.0 || !s.volume_base_ratio.is_finite() {
            s.volume_base_ratio = ScoringParams::default().volume_base_ratio;
        }
        for kw in self
            .keywords
            .short_ascii_allowlist
            .iter_mut()
            .chain(self.keywords.ignored.iter_mut())
        {
            *kw = kw.trim().to_lowercase();
        }
        self
    }
}
