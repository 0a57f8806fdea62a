// src/ingest/providers/newsapi.rs
use async_trait::async_trait;
use serde::Deserialize;

use super::read_body;
use crate::config::NewsApiCredentials;
use crate::error::NewsError;
use crate::ingest::types::{NewsProvider, NewsSource, RawArticle};

const NEWSAPI_URL: &str = "https://newsapi.org/v2/everything";
const NEWSAPI_MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    published_at: Option<String>,
}

impl From<NewsApiArticle> for RawArticle {
    fn from(a: NewsApiArticle) -> Self {
        RawArticle {
            title: a.title.unwrap_or_default(),
            description: a.description.unwrap_or_default(),
            published_at_raw: a.published_at,
        }
    }
}

pub struct NewsApiProvider {
    client: reqwest::Client,
    creds: NewsApiCredentials,
    base_url: String,
}

impl NewsApiProvider {
    pub fn new(client: reqwest::Client, creds: NewsApiCredentials) -> Self {
        Self {
            client,
            creds,
            base_url: NEWSAPI_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn parse_body(body: &str) -> Result<Vec<RawArticle>, NewsError> {
        let parsed: NewsApiResponse =
            serde_json::from_str(body).map_err(|e| NewsError::ParseError(e.to_string()))?;
        Ok(parsed.articles.into_iter().map(RawArticle::from).collect())
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    fn source(&self) -> NewsSource {
        NewsSource::NewsApi
    }

    async fn fetch(&self, query: &str, cap: usize) -> Result<Vec<RawArticle>, NewsError> {
        let page_size = cap.clamp(1, NEWSAPI_MAX_PAGE_SIZE).to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("pageSize", page_size.as_str()),
                ("sortBy", "publishedAt"),
                ("language", "ko"),
            ])
            .header("X-Api-Key", &self.creds.api_key)
            .send()
            .await?;
        let body = read_body(response).await?;
        let mut items = Self::parse_body(&body)?;
        items.truncate(cap);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_fields_become_empty_strings() {
        let body = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"title": "Kospi hits record high", "description": null, "publishedAt": "2024-01-15T01:30:00Z"},
                {"title": null, "description": "body only", "publishedAt": null}
            ]
        }"#;
        let items = NewsApiProvider::parse_body(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "");
        assert_eq!(items[0].published_at_raw.as_deref(), Some("2024-01-15T01:30:00Z"));
        assert_eq!(items[1].title, "");
        assert!(items[1].published_at_raw.is_none());
    }
}
