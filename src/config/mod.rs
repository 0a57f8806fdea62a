// src/config/mod.rs
//! Runtime configuration: static keyword tables + tuning (TOML) and provider
//! credentials (environment).

pub mod credentials;
pub mod settings;

pub use credentials::{DaumCredentials, NaverCredentials, NewsApiCredentials, ProviderCredentials};
pub use settings::{
    IssueCategoryCfg, KeywordRules, LexiconCfg, NewsSettings, PoolParams, ScoringParams,
    DEFAULT_NEWS_SETTINGS_PATH, ENV_NEWS_SETTINGS_PATH,
};
