pub mod model_client;
pub mod news_client;
pub mod social_client;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{MarketEvent, NewsArticle, SocialSignal};
use crate::polymarket::types::{RawEvent, RawOrderBook};

pub use model_client::ModelApiClient;
pub use news_client::NewsApiClient;
pub use social_client::SocialApiClient;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Shared failure type for every upstream capability. Rate limits are a
/// distinct variant so the analyzer can apply the shortened cooldown.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

impl SourceError {
    /// Map an HTTP response to Ok(resp) or the right variant. 429 becomes
    /// `RateLimited`, 404 `NotFound`, other error statuses fall through to
    /// reqwest's status error.
    pub fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, SourceError> {
        match resp.status() {
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                Err(SourceError::RateLimited(resp.url().to_string()))
            }
            reqwest::StatusCode::NOT_FOUND => Err(SourceError::NotFound(resp.url().to_string())),
            _ => Ok(resp.error_for_status()?),
        }
    }
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// The prediction-market platform: event payloads and order books.
#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn fetch_event(&self, slug: &str) -> Result<RawEvent, SourceError>;

    async fn fetch_order_book(&self, token_id: &str) -> Result<RawOrderBook, SourceError>;
}

/// News adapter: articles for an event-level query.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_news(
        &self,
        query: &str,
        event_type: crate::models::EventType,
    ) -> Result<Vec<NewsArticle>, SourceError>;
}

/// Social-sentiment adapter, queried per option.
#[async_trait]
pub trait SocialSource: Send + Sync {
    async fn fetch_sentiment(
        &self,
        option: &str,
        event_title: &str,
        event_type: crate::models::EventType,
    ) -> Result<SocialSignal, SourceError>;
}

/// Per-option estimate from the independent core model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelEstimate {
    /// Option name → probability estimate in [0, 100].
    pub scores: HashMap<String, f64>,
    #[serde(default)]
    pub rationale: Option<String>,
}

/// The opaque core-model oracle. Best effort: the analysis degrades to the
/// market price when it is unavailable.
#[async_trait]
pub trait ModelSource: Send + Sync {
    async fn estimate(&self, event: &MarketEvent) -> Result<ModelEstimate, SourceError>;
}
