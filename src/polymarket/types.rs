use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Gamma API: event and sub-market payloads
// ---------------------------------------------------------------------------

/// Tag attached to a Gamma event. Sometimes a bare string, sometimes an
/// object with a label.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawTag {
    Label {
        #[serde(default)]
        label: Option<String>,
    },
    Plain(String),
}

impl RawTag {
    pub fn text(&self) -> &str {
        match self {
            RawTag::Label { label } => label.as_deref().unwrap_or(""),
            RawTag::Plain(s) => s.as_str(),
        }
    }
}

/// One sub-market of a Gamma event. Every field the upstream may omit or
/// re-type is optional; nothing here is trusted until normalized.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawMarket {
    #[serde(default)]
    pub question: Option<String>,
    /// Short outcome label used in grouped/categorical events.
    #[serde(default, alias = "groupItemTitle")]
    pub group_item_title: Option<String>,
    /// Either a JSON array of price strings/numbers, or that array
    /// JSON-encoded into a single string. Never assume which.
    #[serde(default, alias = "outcomePrices")]
    pub outcome_prices: Option<Value>,
    /// Outcome labels, same dual encoding as `outcome_prices`.
    #[serde(default)]
    pub outcomes: Option<Value>,
    #[serde(default, alias = "lastTradePrice")]
    pub last_trade_price: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    /// Volume arrives as a string on some endpoints and a number on others.
    #[serde(default)]
    pub volume: Option<Value>,
    #[serde(default, alias = "volumeNum")]
    pub volume_num: Option<f64>,
    #[serde(default, alias = "volume24hr")]
    pub volume_24hr: Option<f64>,
    #[serde(default, alias = "oneDayPriceChange")]
    pub one_day_price_change: Option<f64>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub closed: Option<bool>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    /// Stringified JSON array of token IDs, e.g. "[\"token1\", \"token2\"]"
    #[serde(default, alias = "clobTokenIds")]
    pub clob_token_ids: Option<String>,
}

impl RawMarket {
    /// Parse the stringified clobTokenIds into a Vec of token ID strings.
    pub fn parse_token_ids(&self) -> Vec<String> {
        self.clob_token_ids
            .as_deref()
            .and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
            .unwrap_or_default()
    }

    /// Sub-market is open unless the payload says otherwise.
    pub fn is_open(&self) -> bool {
        self.active.unwrap_or(true) && !self.closed.unwrap_or(false)
    }

    /// Best-effort volume. Prefers the numeric field, falls back to the
    /// string-typed one, defaults to 0.
    pub fn volume_value(&self) -> f64 {
        self.volume_num
            .or_else(|| self.volume.as_ref().and_then(value_to_f64))
            .unwrap_or(0.0)
    }
}

/// A Gamma event: the envelope around one or more sub-markets.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawEvent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub volume: Option<Value>,
    #[serde(default, alias = "volume24hr")]
    pub volume_24hr: Option<f64>,
    #[serde(default, alias = "uniqueTraders")]
    pub unique_traders: Option<u64>,
    #[serde(default)]
    pub markets: Vec<RawMarket>,
}

// ---------------------------------------------------------------------------
// CLOB API: order book
// ---------------------------------------------------------------------------

/// One price level. The CLOB returns both fields as strings; anything that
/// fails to parse is treated as zero.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawBookLevel {
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub size: Value,
}

impl RawBookLevel {
    pub fn price_decimal(&self) -> Decimal {
        value_to_decimal(&self.price)
    }

    pub fn size_decimal(&self) -> Decimal {
        value_to_decimal(&self.size)
    }

    /// price × size.
    pub fn notional(&self) -> Decimal {
        self.price_decimal() * self.size_decimal()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawOrderBook {
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub bids: Vec<RawBookLevel>,
    #[serde(default)]
    pub asks: Vec<RawBookLevel>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

// ---------------------------------------------------------------------------
// Tolerant numeric parsing
// ---------------------------------------------------------------------------

/// Extract an f64 from a JSON number or a numeric string. None otherwise.
pub fn value_to_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn value_to_decimal(v: &Value) -> Decimal {
    match v {
        Value::Number(n) => n
            .as_f64()
            .and_then(Decimal::from_f64_retain)
            .unwrap_or(Decimal::ZERO),
        Value::String(s) => Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Decode a price/label array that may arrive as a real JSON array or as a
/// JSON-encoded string of one. Elements may be numbers or numeric strings;
/// unparseable elements become 0 rather than failing the event.
pub fn parse_price_array(raw: &Value) -> Vec<f64> {
    let items: Vec<Value> = match raw {
        Value::Array(items) => items.clone(),
        Value::String(s) => serde_json::from_str::<Vec<Value>>(s).unwrap_or_default(),
        _ => Vec::new(),
    };

    items
        .iter()
        .map(|v| value_to_f64(v).unwrap_or(0.0))
        .collect()
}

/// Same dual decoding for string arrays (outcome labels).
pub fn parse_string_array(raw: &Value) -> Vec<String> {
    let items: Vec<Value> = match raw {
        Value::Array(items) => items.clone(),
        Value::String(s) => serde_json::from_str::<Vec<Value>>(s).unwrap_or_default(),
        _ => Vec::new(),
    };

    items
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}
