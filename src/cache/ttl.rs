use crate::models::EventType;

pub const MIN_TTL_MINUTES: i64 = 10;
pub const MAX_TTL_MINUTES: i64 = 360;

/// Base TTL from time-to-resolution. Monotonic: closer resolution, shorter
/// cache life.
fn base_minutes(hours_to_resolution: f64) -> f64 {
    match hours_to_resolution {
        h if h < 1.0 => 10.0,
        h if h < 3.0 => 20.0,
        h if h < 6.0 => 30.0,
        h if h < 24.0 => 60.0,
        h if h < 72.0 => 90.0,
        h if h < 168.0 => 120.0,
        h if h < 720.0 => 180.0,
        _ => 240.0,
    }
}

/// Category multiplier. Free-text category keywords win over the classified
/// event type, so a miscategorized event still refreshes at the right rate.
fn multiplier(category: &str, event_type: EventType) -> f64 {
    let category = category.to_lowercase();

    if category.contains("crypto") {
        return 0.5;
    }
    if category.contains("sport") {
        return 0.7;
    }
    if category.contains("politic") {
        return 1.5;
    }

    match event_type {
        EventType::Crypto => 0.5,
        EventType::Sports => 0.7,
        EventType::Politics => 1.5,
        EventType::Pop | EventType::Other => 1.0,
    }
}

/// Adaptive TTL in minutes. Pure function of its three inputs, always within
/// [MIN_TTL_MINUTES, MAX_TTL_MINUTES].
pub fn ttl_minutes(hours_to_resolution: f64, category: &str, event_type: EventType) -> i64 {
    let minutes = base_minutes(hours_to_resolution) * multiplier(category, event_type);
    (minutes.round() as i64).clamp(MIN_TTL_MINUTES, MAX_TTL_MINUTES)
}
