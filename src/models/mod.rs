pub mod analysis;
pub mod cache;
pub mod event;

pub use analysis::{
    AnalysisOption, AnalysisPayload, AnalysisResponse, PricingLabel, SignalVector,
};
pub use cache::CacheEntry;
pub use event::{
    EventMetrics, EventType, MarketEvent, MarketOption, NewsArticle, SocialSignal, WhaleData,
};
