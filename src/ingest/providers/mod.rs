// src/ingest/providers/mod.rs
//! Vendor adapters. Each one owns its request shape and JSON parsing and
//! hands back plain [`RawArticle`]s.

pub mod daum;
pub mod naver;
pub mod newsapi;

use std::sync::Arc;
use std::time::Duration;

use crate::config::ProviderCredentials;
use crate::error::NewsError;
use crate::ingest::types::NewsProvider;

pub use daum::DaumProvider;
pub use naver::NaverProvider;
pub use newsapi::NewsApiProvider;

const USER_AGENT: &str = concat!("sector-news-signals/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for the adapters.
pub fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// One adapter per configured vendor, in the fixed order naver, daum, newsapi.
pub fn build_providers(
    creds: &ProviderCredentials,
    timeout: Duration,
) -> Vec<Arc<dyn NewsProvider>> {
    let client = http_client(timeout);
    let mut out: Vec<Arc<dyn NewsProvider>> = Vec::new();
    if let Some(c) = &creds.naver {
        out.push(Arc::new(NaverProvider::new(client.clone(), c.clone())));
    }
    if let Some(c) = &creds.daum {
        out.push(Arc::new(DaumProvider::new(client.clone(), c.clone())));
    }
    if let Some(c) = &creds.newsapi {
        out.push(Arc::new(NewsApiProvider::new(client, c.clone())));
    }
    tracing::debug!(target: "providers", enabled = out.len(), "news providers built");
    out
}

/// Status check shared by the adapters; the body goes to each adapter's
/// `parse_body`.
pub(crate) async fn read_body(response: reqwest::Response) -> Result<String, NewsError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(NewsError::ApiError {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DaumCredentials, NaverCredentials, NewsApiCredentials};
    use crate::ingest::types::NewsSource;

    #[test]
    fn builds_only_configured_vendors_in_fixed_order() {
        let none = build_providers(&ProviderCredentials::default(), Duration::from_secs(1));
        assert!(none.is_empty());

        let creds = ProviderCredentials {
            naver: Some(NaverCredentials {
                client_id: "id".into(),
                client_secret: "secret".into(),
            }),
            daum: None,
            newsapi: Some(NewsApiCredentials {
                api_key: "k".into(),
            }),
        };
        let sources: Vec<NewsSource> = build_providers(&creds, Duration::from_secs(1))
            .iter()
            .map(|p| p.source())
            .collect();
        assert_eq!(sources, vec![NewsSource::Naver, NewsSource::NewsApi]);

        let daum_only = ProviderCredentials {
            daum: Some(DaumCredentials {
                api_key: "k".into(),
            }),
            ..Default::default()
        };
        assert_eq!(
            build_providers(&daum_only, Duration::from_secs(1))[0].source(),
            NewsSource::Daum
        );
    }
}
