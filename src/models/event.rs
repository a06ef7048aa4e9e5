use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EventType
// ---------------------------------------------------------------------------

/// Coarse event category driving signal weights and cache TTL multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Sports,
    Politics,
    Crypto,
    Pop,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Sports => "sports",
            EventType::Politics => "politics",
            EventType::Crypto => "crypto",
            EventType::Pop => "pop",
            EventType::Other => "other",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Canonical event model
// ---------------------------------------------------------------------------

/// One outcome of a market, normalized from the raw payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOption {
    pub name: String,
    pub image: Option<String>,
    /// Probability implied by the current market price, in [0, 1].
    pub implied_probability: f64,
    /// Share of event volume attributed to this option, in [0, 100].
    pub volume_share_percent: f64,
    /// Signed 24h price change, in percent points.
    pub price_change_24h: f64,
}

impl MarketOption {
    /// Market probability as an integer percentage, [0, 100].
    pub fn market_probability(&self) -> i64 {
        (self.implied_probability.clamp(0.0, 1.0) * 100.0).round() as i64
    }
}

/// Order-book wall counts per side. A "wall" is a level whose notional
/// (price × size) exceeds the large-order threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhaleData {
    pub buy_walls: u32,
    pub sell_walls: u32,
    pub total_walls: u32,
}

/// Event-level activity metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventMetrics {
    pub total_volume: f64,
    pub volume_24h: f64,
    pub total_wallets: u64,
    pub whale_data: Option<WhaleData>,
}

/// A news article gathered for the event. Sentiment may be supplied by the
/// news source; absent, the collector scores it with a keyword heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    /// Pre-scored sentiment in [-100, 100] when the adapter provides one.
    #[serde(default)]
    pub sentiment: Option<f64>,
}

/// Per-option social sentiment as returned by the social adapter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SocialSignal {
    /// Sentiment score in [-100, 100].
    pub score: f64,
    pub engagement: f64,
    /// Trend direction in [-1, 1] (falling / flat / rising).
    pub trend: f64,
    pub post_count: u64,
}

/// Canonical market event. `options` is ordered (probability-descending for
/// grouped markets) and never empty; the normalizer rejects an event that
/// yields no options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketEvent {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub event_type: EventType,
    pub resolution_method: String,
    pub subjectivity_level: String,
    pub time_to_resolution_hours: f64,
    pub options: Vec<MarketOption>,
    pub event_metrics: EventMetrics,
    /// Filled by the signal collector, not the normalizer.
    pub news_articles: Option<Vec<NewsArticle>>,
    /// Option name → social signal. Filled by the signal collector.
    #[serde(default)]
    pub social_data: HashMap<String, SocialSignal>,
}

impl MarketEvent {
    /// Option names ranked by market probability, highest first.
    pub fn ranked_options(&self) -> Vec<&MarketOption> {
        let mut ranked: Vec<&MarketOption> = self.options.iter().collect();
        ranked.sort_by(|a, b| {
            b.implied_probability
                .partial_cmp(&a.implied_probability)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}
