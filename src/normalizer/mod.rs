pub mod classifier;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::errors::AnalysisError;
use crate::models::{EventMetrics, MarketEvent, MarketOption, WhaleData};
use crate::polymarket::types::{
    parse_price_array, parse_string_array, value_to_f64, RawEvent, RawMarket, RawOrderBook,
    RawTag,
};

pub use classifier::classify_tags;

/// Grouped markets keep only this many sub-markets, ranked by volume.
const GROUPED_MARKET_LIMIT: usize = 5;

/// Order-book levels above this notional (price × size) count as walls.
const WHALE_NOTIONAL_THRESHOLD: i64 = 5_000;

// ---------------------------------------------------------------------------
// Event normalization
// ---------------------------------------------------------------------------

/// Normalize a raw Gamma payload into the canonical event model.
///
/// Parsing is total: a malformed sub-market degrades to probability 0, and
/// absent numeric fields default to 0. The only hard failure is an event
/// that yields no options at all.
pub fn normalize_event(slug: &str, raw: &RawEvent) -> Result<MarketEvent, AnalysisError> {
    let title = raw
        .title
        .clone()
        .or_else(|| raw.slug.clone())
        .unwrap_or_else(|| slug.to_string());

    let category = raw
        .category
        .clone()
        .or_else(|| raw.tags.first().map(|t| t.text().to_string()))
        .unwrap_or_default();

    let tag_texts: Vec<&str> = std::iter::once(category.as_str())
        .chain(raw.tags.iter().map(RawTag::text))
        .collect();
    let event_type = classify_tags(tag_texts);

    let options = if raw.markets.len() > 1 {
        normalize_grouped(&raw.markets)
    } else if let Some(market) = raw.markets.first() {
        normalize_binary(market)
    } else {
        Vec::new()
    };

    if options.is_empty() {
        return Err(AnalysisError::NoMarketsFound(slug.to_string()));
    }

    let total_volume = raw
        .volume
        .as_ref()
        .and_then(value_to_f64)
        .unwrap_or_else(|| raw.markets.iter().map(RawMarket::volume_value).sum());
    let volume_24h = raw
        .volume_24hr
        .unwrap_or_else(|| raw.markets.iter().filter_map(|m| m.volume_24hr).sum());

    Ok(MarketEvent {
        slug: slug.to_string(),
        title,
        category,
        event_type,
        resolution_method: "market".into(),
        subjectivity_level: "objective".into(),
        time_to_resolution_hours: hours_to_resolution(raw.end_date.as_deref(), Utc::now()),
        options,
        event_metrics: EventMetrics {
            total_volume,
            volume_24h,
            total_wallets: raw.unique_traders.unwrap_or(0),
            whale_data: None,
        },
        news_articles: None,
        social_data: Default::default(),
    })
}

/// Grouped/categorical event: top sub-markets by volume, one option each,
/// sorted by probability descending.
fn normalize_grouped(markets: &[RawMarket]) -> Vec<MarketOption> {
    let mut open: Vec<&RawMarket> = markets.iter().filter(|m| m.is_open()).collect();
    open.sort_by(|a, b| {
        b.volume_value()
            .partial_cmp(&a.volume_value())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    open.truncate(GROUPED_MARKET_LIMIT);

    let total_volume: f64 = open.iter().map(|m| m.volume_value()).sum();

    let mut options: Vec<MarketOption> = open
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let name = m
                .group_item_title
                .clone()
                .or_else(|| m.question.clone())
                .unwrap_or_else(|| format!("Option {}", i + 1));

            let share = if total_volume > 0.0 {
                m.volume_value() / total_volume * 100.0
            } else {
                0.0
            };

            MarketOption {
                name,
                image: m.image.clone().or_else(|| m.icon.clone()),
                implied_probability: market_price(m).clamp(0.0, 1.0),
                volume_share_percent: share,
                price_change_24h: m.one_day_price_change.unwrap_or(0.0) * 100.0,
            }
        })
        .collect();

    options.sort_by(|a, b| {
        b.implied_probability
            .partial_cmp(&a.implied_probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    options
}

/// Binary event: exactly two options from a two-element price array, falling
/// back to `price` / `1 - price` when the array is missing or short.
fn normalize_binary(market: &RawMarket) -> Vec<MarketOption> {
    let prices = market
        .outcome_prices
        .as_ref()
        .map(parse_price_array)
        .unwrap_or_default();

    let (yes_price, no_price) = if prices.len() >= 2 {
        (prices[0], prices[1])
    } else {
        let p = market
            .last_trade_price
            .or(market.price)
            .unwrap_or(0.0);
        (p, 1.0 - p)
    };

    let labels = market
        .outcomes
        .as_ref()
        .map(parse_string_array)
        .unwrap_or_default();
    let (yes_name, no_name) = if labels.len() >= 2 {
        (labels[0].clone(), labels[1].clone())
    } else {
        ("Yes".to_string(), "No".to_string())
    };

    let change = market.one_day_price_change.unwrap_or(0.0) * 100.0;
    let image = market.image.clone().or_else(|| market.icon.clone());

    // No per-outcome volume split exists on a binary market; conviction
    // comes from price change and whale walls instead.
    vec![
        MarketOption {
            name: yes_name,
            image: image.clone(),
            implied_probability: yes_price.clamp(0.0, 1.0),
            volume_share_percent: 50.0,
            price_change_24h: change,
        },
        MarketOption {
            name: no_name,
            image,
            implied_probability: no_price.clamp(0.0, 1.0),
            volume_share_percent: 50.0,
            price_change_24h: -change,
        },
    ]
}

/// Priority chain: outcomePrices[0] → lastTradePrice → price → 0.
fn market_price(market: &RawMarket) -> f64 {
    market
        .outcome_prices
        .as_ref()
        .map(parse_price_array)
        .and_then(|prices| prices.first().copied())
        .or(market.last_trade_price)
        .or(market.price)
        .unwrap_or(0.0)
}

fn hours_to_resolution(end_date: Option<&str>, now: DateTime<Utc>) -> f64 {
    end_date
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|end| {
            let hours = (end.with_timezone(&Utc) - now).num_minutes() as f64 / 60.0;
            hours.max(0.0)
        })
        .unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Whale walls
// ---------------------------------------------------------------------------

/// Count order-book levels whose notional exceeds the wall threshold, per
/// side. A malformed or empty book counts zero walls on both sides.
pub fn whale_walls(book: &RawOrderBook) -> WhaleData {
    let threshold = Decimal::from(WHALE_NOTIONAL_THRESHOLD);

    let buy_walls = book
        .bids
        .iter()
        .filter(|level| level.notional() > threshold)
        .count() as u32;
    let sell_walls = book
        .asks
        .iter()
        .filter(|level| level.notional() > threshold)
        .count() as u32;

    WhaleData {
        buy_walls,
        sell_walls,
        total_walls: buy_walls + sell_walls,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
