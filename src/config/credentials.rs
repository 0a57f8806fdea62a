// src/config/credentials.rs
//! Provider credentials read from the environment (`.env` is loaded by the binary).
//!
//! A provider counts as enabled only when all of its credentials are present
//! and non-empty after trimming.

use crate::ingest::types::NewsSource;

pub const ENV_NAVER_CLIENT_ID: &str = "NAVER_CLIENT_ID";
pub const ENV_NAVER_CLIENT_SECRET: &str = "NAVER_CLIENT_SECRET";
pub const ENV_KAKAO_REST_API_KEY: &str = "KAKAO_REST_API_KEY";
pub const ENV_NEWSAPI_KEY: &str = "NEWSAPI_KEY";

// Legacy names kept by older deployments.
const LEGACY_NAVER_CLIENT_ID: &str = "NEXT_PUBLIC_NAVER_API_CLIENT_ID";
const LEGACY_NAVER_CLIENT_SECRET: &str = "NEXT_PUBLIC_NAVER_API_CLIENT_SECRET";
const LEGACY_DAUM_API_KEY: &str = "NEXT_PUBLIC_DAUM_API_KEY";
const LEGACY_NEWSAPI_KEY: &str = "NEXT_PUBLIC_NEWSAPI_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaverCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaumCredentials {
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsApiCredentials {
    pub api_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub naver: Option<NaverCredentials>,
    pub daum: Option<DaumCredentials>,
    pub newsapi: Option<NewsApiCredentials>,
}

impl ProviderCredentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source (env, test map, ...).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |primary: &str, legacy: &str| -> Option<String> {
            [primary, legacy]
                .into_iter()
                .filter_map(|name| lookup(name))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
        };

        let naver = match (
            read(ENV_NAVER_CLIENT_ID, LEGACY_NAVER_CLIENT_ID),
            read(ENV_NAVER_CLIENT_SECRET, LEGACY_NAVER_CLIENT_SECRET),
        ) {
            (Some(client_id), Some(client_secret)) => Some(NaverCredentials {
                client_id,
                client_secret,
            }),
            _ => None,
        };
        let daum = read(ENV_KAKAO_REST_API_KEY, LEGACY_DAUM_API_KEY)
            .map(|api_key| DaumCredentials { api_key });
        let newsapi =
            read(ENV_NEWSAPI_KEY, LEGACY_NEWSAPI_KEY).map(|api_key| NewsApiCredentials { api_key });

        Self {
            naver,
            daum,
            newsapi,
        }
    }

    pub fn enabled_sources(&self) -> Vec<NewsSource> {
        let mut out = Vec::new();
        if self.naver.is_some() {
            out.push(NewsSource::Naver);
        }
        if self.daum.is_some() {
            out.push(NewsSource::Daum);
        }
        if self.newsapi.is_some() {
            out.push(NewsSource::NewsApi);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn naver_requires_both_id_and_secret() {
        let c = ProviderCredentials::from_lookup(lookup_from(&[(ENV_NAVER_CLIENT_ID, "id")]));
        assert!(c.naver.is_none());
        assert!(c.enabled_sources().is_empty());
    }

    #[test]
    fn legacy_names_and_blank_values() {
        let c = ProviderCredentials::from_lookup(lookup_from(&[
            (ENV_KAKAO_REST_API_KEY, "   "),
            (LEGACY_DAUM_API_KEY, " kakao "),
            (ENV_NEWSAPI_KEY, "n-key"),
        ]));
        assert_eq!(c.daum.as_ref().map(|d| d.api_key.as_str()), Some("kakao"));
        assert_eq!(
            c.enabled_sources(),
            vec![NewsSource::Daum, NewsSource::NewsApi]
        );
    }

    #[serial_test::serial]
    #[test]
    fn from_env_reads_process_environment() {
        std::env::set_var(ENV_NAVER_CLIENT_ID, "abc");
        std::env::set_var(ENV_NAVER_CLIENT_SECRET, "def");
        let c = ProviderCredentials::from_env();
        std::env::remove_var(ENV_NAVER_CLIENT_ID);
        std::env::remove_var(ENV_NAVER_CLIENT_SECRET);
        assert_eq!(
            c.naver,
            Some(NaverCredentials {
                client_id: "abc".into(),
                client_secret: "def".into()
            })
        );
    }
}
