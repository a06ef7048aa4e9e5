use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::models::{EventType, SocialSignal};

use super::{SocialSource, SourceError};

/// Thin adapter over a social-sentiment endpoint. The upstream does the
/// aggregation; this client only shapes the response.
#[derive(Debug, Clone)]
pub struct SocialApiClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct SentimentResponse {
    #[serde(default)]
    score: f64,
    #[serde(default)]
    engagement: f64,
    #[serde(default)]
    trend: f64,
    #[serde(default, alias = "postCount")]
    post_count: u64,
}

impl SocialApiClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SocialSource for SocialApiClient {
    async fn fetch_sentiment(
        &self,
        option: &str,
        event_title: &str,
        event_type: EventType,
    ) -> Result<SocialSignal, SourceError> {
        let url = format!("{}/sentiment", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("q", option),
                ("context", event_title),
                ("category", event_type.as_str()),
            ])
            .send()
            .await?;
        let resp = SourceError::check_status(resp)?;

        let body: SentimentResponse = resp.json().await?;
        Ok(SocialSignal {
            score: body.score.clamp(-100.0, 100.0),
            engagement: body.engagement,
            trend: body.trend.clamp(-1.0, 1.0),
            post_count: body.post_count,
        })
    }
}
