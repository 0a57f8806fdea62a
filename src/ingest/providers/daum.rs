// src/ingest/providers/daum.rs
//! Daum news search through the Kakao REST API.

use async_trait::async_trait;
use serde::Deserialize;

use super::read_body;
use crate::config::DaumCredentials;
use crate::error::NewsError;
use crate::ingest::types::{NewsProvider, NewsSource, RawArticle};

const DAUM_NEWS_URL: &str = "https://dapi.kakao.com/v2/search/news";
const DAUM_MAX_SIZE: usize = 50;

#[derive(Debug, Deserialize)]
struct DaumResponse {
    #[serde(default)]
    documents: Vec<DaumDocument>,
}

#[derive(Debug, Deserialize)]
struct DaumDocument {
    #[serde(default)]
    title: String,
    #[serde(default)]
    contents: String,
    datetime: Option<String>,
}

impl From<DaumDocument> for RawArticle {
    fn from(d: DaumDocument) -> Self {
        RawArticle {
            title: d.title,
            description: d.contents,
            published_at_raw: d.datetime,
        }
    }
}

pub struct DaumProvider {
    client: reqwest::Client,
    creds: DaumCredentials,
    base_url: String,
}

impl DaumProvider {
    pub fn new(client: reqwest::Client, creds: DaumCredentials) -> Self {
        Self {
            client,
            creds,
            base_url: DAUM_NEWS_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn parse_body(body: &str) -> Result<Vec<RawArticle>, NewsError> {
        let parsed: DaumResponse =
            serde_json::from_str(body).map_err(|e| NewsError::ParseError(e.to_string()))?;
        Ok(parsed.documents.into_iter().map(RawArticle::from).collect())
    }
}

#[async_trait]
impl NewsProvider for DaumProvider {
    fn source(&self) -> NewsSource {
        NewsSource::Daum
    }

    async fn fetch(&self, query: &str, cap: usize) -> Result<Vec<RawArticle>, NewsError> {
        let size = cap.clamp(1, DAUM_MAX_SIZE).to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("query", query), ("size", size.as_str()), ("sort", "recency")])
            .header("Authorization", format!("KakaoAK {}", self.creds.api_key))
            .send()
            .await?;
        let body = read_body(response).await?;
        let mut items = Self::parse_body(&body)?;
        items.truncate(cap);
        Ok(items)
    }
}
