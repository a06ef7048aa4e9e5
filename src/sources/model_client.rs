use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::models::MarketEvent;

use super::{ModelEstimate, ModelSource, SourceError};

/// Client for the external estimator service. One call per event; the
/// response carries a score per option plus an optional rationale.
#[derive(Debug, Clone)]
pub struct ModelApiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct EstimateRequest<'a> {
    title: &'a str,
    category: &'a str,
    event_type: &'a str,
    options: Vec<&'a str>,
    time_to_resolution_hours: f64,
}

impl ModelApiClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl ModelSource for ModelApiClient {
    async fn estimate(&self, event: &MarketEvent) -> Result<ModelEstimate, SourceError> {
        let url = format!("{}/estimate", self.base_url);
        let body = EstimateRequest {
            title: &event.title,
            category: &event.category,
            event_type: event.event_type.as_str(),
            options: event.options.iter().map(|o| o.name.as_str()).collect(),
            time_to_resolution_hours: event.time_to_resolution_hours,
        };

        let mut req = self.http.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await?;
        let resp = SourceError::check_status(resp)?;

        let estimate: ModelEstimate = resp.json().await?;
        Ok(estimate)
    }
}
