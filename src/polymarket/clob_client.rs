use reqwest::Client;

use crate::sources::SourceError;

use super::types::RawOrderBook;

/// Read-only client for the CLOB API. Only the public order-book endpoint is
/// used; authenticated trading endpoints are out of scope.
#[derive(Debug, Clone)]
pub struct ClobClient {
    http: Client,
    base_url: String,
}

impl ClobClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Fetch the order book for a token.
    pub async fn get_order_book(&self, token_id: &str) -> Result<RawOrderBook, SourceError> {
        let url = format!("{}/book", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("token_id", token_id)])
            .send()
            .await?;
        let resp = SourceError::check_status(resp)?;

        let book: RawOrderBook = resp.json().await?;
        Ok(book)
    }
}
