use polysight::cache::{ttl_minutes, MAX_TTL_MINUTES, MIN_TTL_MINUTES};
use polysight::engine::{blend, BlendInput};
use polysight::models::{EventType, PricingLabel, SignalVector};

fn run_blend(event_type: EventType, market: i64, core: f64, news: f64, momentum: f64) -> polysight::models::AnalysisOption {
    blend(
        event_type,
        BlendInput {
            option: "Yes".into(),
            market_probability: market,
            image: None,
            vectors: SignalVector {
                core_ai_score: core,
                news_score: news,
                momentum_score: momentum,
                social_score: 0.0,
            },
        },
        None,
    )
}

#[test]
fn extreme_market_guard_fixture() {
    // A contrarian model against a 95% market with no supporting signals
    // gets confidence 0.10: final = 20×0.10 + 95×0.90 → 87.
    let out = run_blend(EventType::Other, 95, 20.0, 0.0, 0.0);
    assert_eq!(out.ai_score, 87);
    assert_eq!(out.pricing_label, PricingLabel::Overpriced);
}

#[test]
fn balanced_crypto_fixture() {
    // news impact 0.8×40 = 32, model price clamps at 99, alignment 3 →
    // confidence 0.90 → final 94, Underpriced.
    let out = run_blend(EventType::Crypto, 50, 70.0, 80.0, 0.0);
    assert_eq!(out.ai_score, 94);
    assert_eq!(out.pricing_deviation, 44);
    assert_eq!(out.pricing_label, PricingLabel::Underpriced);
}

#[test]
fn blending_is_pure() {
    let runs: Vec<i64> = (0..5)
        .map(|_| run_blend(EventType::Sports, 35, 55.0, -30.0, 20.0).ai_score)
        .collect();
    assert!(runs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn scores_hold_range_invariant() {
    for market in [0i64, 1, 9, 10, 50, 90, 91, 99, 100] {
        for core in [0.0, 25.0, 50.0, 75.0, 100.0] {
            for news in [-100.0, 0.0, 100.0] {
                let out = run_blend(EventType::Pop, market, core, news, 0.0);
                assert!((0..=100).contains(&out.ai_score));
                assert!((0..=100).contains(&out.market_probability));
                assert_eq!(out.pricing_deviation, out.ai_score - out.market_probability);
            }
        }
    }
}

#[test]
fn ttl_politics_example() {
    // base 90 for <72h, ×1.5 for politics.
    assert_eq!(ttl_minutes(50.0, "Politics", EventType::Politics), 135);
}

#[test]
fn ttl_bounds_hold_everywhere() {
    for h in [0.0, 0.9, 2.0, 5.0, 12.0, 48.0, 100.0, 400.0, 5000.0] {
        for (category, event_type) in [
            ("Crypto", EventType::Crypto),
            ("Sports", EventType::Sports),
            ("Politics", EventType::Politics),
            ("Pop", EventType::Pop),
            ("Misc", EventType::Other),
        ] {
            let ttl = ttl_minutes(h, category, event_type);
            assert!((MIN_TTL_MINUTES..=MAX_TTL_MINUTES).contains(&ttl));
        }
    }
}
