use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::models::{EventType, NewsArticle};

use super::{NewsSource, SourceError};

/// newsapi.org-style adapter. Returns raw articles; relevance filtering and
/// sentiment scoring happen in the signal collector.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    source: Option<NewsApiSourceRef>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSourceRef {
    #[serde(default)]
    name: Option<String>,
}

impl NewsApiClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn category_hint(event_type: EventType) -> &'static str {
        match event_type {
            EventType::Sports => "sports",
            EventType::Politics => "politics",
            EventType::Crypto => "business",
            EventType::Pop => "entertainment",
            EventType::Other => "general",
        }
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch_news(
        &self,
        query: &str,
        event_type: EventType,
    ) -> Result<Vec<NewsArticle>, SourceError> {
        let url = format!("{}/everything", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("category", Self::category_hint(event_type)),
                ("sortBy", "publishedAt"),
                ("pageSize", "20"),
                ("apiKey", &self.api_key),
            ])
            .send()
            .await?;
        let resp = SourceError::check_status(resp)?;

        let body: NewsApiResponse = resp.json().await?;
        let articles = body
            .articles
            .into_iter()
            .filter_map(|a| {
                let title = a.title?;
                Some(NewsArticle {
                    title,
                    description: a.description.unwrap_or_default(),
                    url: a.url,
                    source: a.source.and_then(|s| s.name),
                    sentiment: None,
                })
            })
            .collect();

        Ok(articles)
    }
}
