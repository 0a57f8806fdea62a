// src/ingest/providers/naver.rs
use async_trait::async_trait;
use serde::Deserialize;

use super::read_body;
use crate::config::NaverCredentials;
use crate::error::NewsError;
use crate::ingest::types::{NewsProvider, NewsSource, RawArticle};

const NAVER_NEWS_URL: &str = "https://openapi.naver.com/v1/search/news.json";
// Naver rejects display > 100.
const NAVER_MAX_DISPLAY: usize = 100;

#[derive(Debug, Deserialize)]
struct NaverResponse {
    #[serde(default)]
    items: Vec<NaverItem>,
}

#[derive(Debug, Deserialize)]
struct NaverItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

impl From<NaverItem> for RawArticle {
    fn from(it: NaverItem) -> Self {
        RawArticle {
            title: it.title,
            description: it.description,
            published_at_raw: it.pub_date,
        }
    }
}

pub struct NaverProvider {
    client: reqwest::Client,
    creds: NaverCredentials,
    base_url: String,
}

impl NaverProvider {
    pub fn new(client: reqwest::Client, creds: NaverCredentials) -> Self {
        Self {
            client,
            creds,
            base_url: NAVER_NEWS_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Titles and descriptions keep Naver's `<b>` highlight markup; the
    /// normalizer strips it later.
    pub fn parse_body(body: &str) -> Result<Vec<RawArticle>, NewsError> {
        let parsed: NaverResponse =
            serde_json::from_str(body).map_err(|e| NewsError::ParseError(e.to_string()))?;
        Ok(parsed.items.into_iter().map(RawArticle::from).collect())
    }
}

#[async_trait]
impl NewsProvider for NaverProvider {
    fn source(&self) -> NewsSource {
        NewsSource::Naver
    }

    async fn fetch(&self, query: &str, cap: usize) -> Result<Vec<RawArticle>, NewsError> {
        let display = cap.clamp(1, NAVER_MAX_DISPLAY).to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("query", query), ("display", display.as_str()), ("sort", "date")])
            .header("X-Naver-Client-Id", &self.creds.client_id)
            .header("X-Naver-Client-Secret", &self.creds.client_secret)
            .send()
            .await?;
        let body = read_body(response).await?;
        let mut items = Self::parse_body(&body)?;
        items.truncate(cap);
        Ok(items)
    }
}
