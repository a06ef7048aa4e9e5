use reqwest::Client;

use crate::sources::SourceError;

use super::types::RawEvent;

/// Read-only client for the Gamma API (event metadata and sub-markets).
#[derive(Debug, Clone)]
pub struct GammaClient {
    http: Client,
    base_url: String,
}

impl GammaClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Fetch a single event by slug. The endpoint returns an array; an empty
    /// one means the slug doesn't resolve to any event.
    pub async fn get_event_by_slug(&self, slug: &str) -> Result<RawEvent, SourceError> {
        let url = format!("{}/events", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("slug", slug)])
            .send()
            .await?;
        let resp = SourceError::check_status(resp)?;

        let mut events: Vec<RawEvent> = resp.json().await?;
        if events.is_empty() {
            return Err(SourceError::NotFound(format!("event slug {slug}")));
        }
        Ok(events.swap_remove(0))
    }
}
