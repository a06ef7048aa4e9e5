use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::event::EventType;

// ---------------------------------------------------------------------------
// Signal vectors
// ---------------------------------------------------------------------------

/// Per-option signal inputs to the blending engine. `social_score` rides
/// along for annotation and persistence; the blend itself is a function of
/// the other three.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalVector {
    /// Independent model estimate in [0, 100]. Defaults to the market
    /// probability when the model source is unavailable.
    pub core_ai_score: f64,
    /// News sentiment in [-100, 100].
    pub news_score: f64,
    /// Price/volume/whale momentum in [-100, 100].
    pub momentum_score: f64,
    /// Social sentiment in [-100, 100].
    pub social_score: f64,
}

impl SignalVector {
    /// Neutral vector: no signal beyond the market's own price.
    pub fn neutral(market_probability: f64) -> Self {
        Self {
            core_ai_score: market_probability,
            news_score: 0.0,
            momentum_score: 0.0,
            social_score: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Pricing label
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingLabel {
    Underpriced,
    FairlyPriced,
    Overpriced,
}

impl PricingLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingLabel::Underpriced => "Underpriced",
            PricingLabel::FairlyPriced => "FairlyPriced",
            PricingLabel::Overpriced => "Overpriced",
        }
    }
}

impl fmt::Display for PricingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Analysis output
// ---------------------------------------------------------------------------

/// Blended verdict for one option.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOption {
    pub option: String,
    /// Market-implied probability, integer percent [0, 100].
    pub market_probability: i64,
    /// Blended fair probability, integer percent [0, 100].
    pub ai_score: i64,
    pub pricing_label: PricingLabel,
    /// ai_score - market_probability.
    pub pricing_deviation: i64,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub vectors: SignalVector,
}

/// The cache-persisted unit: everything `analyze` computed for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub event_type: EventType,
    /// Hours until resolution at compute time; a TTL input, kept so the
    /// stored entry explains its own expiry.
    pub time_to_resolution_hours: f64,
    pub options: Vec<AnalysisOption>,
    pub computed_at: DateTime<Utc>,
}

/// What `analyze` returns to callers: the payload plus cache bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub options: Vec<AnalysisOption>,
    pub title: String,
    pub event_type: EventType,
    pub cached: bool,
    pub cached_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub cache_age_minutes: i64,
    pub ttl_minutes: i64,
    /// Minutes until a refresh will be honored. 0 when already refreshable.
    pub refresh_available_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_warning: Option<String>,
    /// Set when the entry was served past its TTL because recompute failed.
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub stale: bool,
}
