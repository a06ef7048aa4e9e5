pub mod clob_client;
pub mod gamma_client;
pub mod types;

use async_trait::async_trait;

use crate::sources::{MarketSource, SourceError};

pub use clob_client::ClobClient;
pub use gamma_client::GammaClient;
pub use types::{RawEvent, RawMarket, RawOrderBook};

/// Polymarket as a `MarketSource`: Gamma for event payloads, CLOB for order
/// books.
#[derive(Debug, Clone)]
pub struct PolymarketSource {
    gamma: GammaClient,
    clob: ClobClient,
}

impl PolymarketSource {
    pub fn new(gamma: GammaClient, clob: ClobClient) -> Self {
        Self { gamma, clob }
    }
}

#[async_trait]
impl MarketSource for PolymarketSource {
    async fn fetch_event(&self, slug: &str) -> Result<RawEvent, SourceError> {
        self.gamma.get_event_by_slug(slug).await
    }

    async fn fetch_order_book(&self, token_id: &str) -> Result<RawOrderBook, SourceError> {
        self.clob.get_order_book(token_id).await
    }
}
