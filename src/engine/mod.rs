//! The blending engine: a pure, deterministic function from market price and
//! signal vectors to a fair probability and pricing label. No I/O, no clock.

use crate::models::{AnalysisOption, EventType, PricingLabel, SignalVector};

/// Divergence beyond which an option is labeled Under/Overpriced.
const LABEL_THRESHOLD: i64 = 5;

// ---------------------------------------------------------------------------
// Weight tables
// ---------------------------------------------------------------------------

/// Per-event-type vector weights. Each row sums to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub core: f64,
    pub news: f64,
    pub momentum: f64,
}

/// Fixed weight table. These values are contract, not tuning defaults.
pub fn weights_for(event_type: EventType) -> BlendWeights {
    match event_type {
        EventType::Politics => BlendWeights {
            core: 0.70,
            news: 0.25,
            momentum: 0.05,
        },
        EventType::Crypto => BlendWeights {
            core: 0.30,
            news: 0.40,
            momentum: 0.30,
        },
        EventType::Sports => BlendWeights {
            core: 0.60,
            news: 0.35,
            momentum: 0.05,
        },
        EventType::Pop => BlendWeights {
            core: 0.30,
            news: 0.70,
            momentum: 0.0,
        },
        EventType::Other => BlendWeights {
            core: 0.50,
            news: 0.30,
            momentum: 0.20,
        },
    }
}

// ---------------------------------------------------------------------------
// Blend steps
// ---------------------------------------------------------------------------

/// Pre-blend probability: core estimate shifted by weighted news and
/// momentum impacts, clamped to [1, 99].
pub fn model_price(vectors: &SignalVector, weights: BlendWeights) -> f64 {
    let news_impact = vectors.news_score / 100.0 * (weights.news * 100.0);
    let momentum_impact = vectors.momentum_score / 100.0 * (weights.momentum * 100.0);

    (vectors.core_ai_score + news_impact + momentum_impact).clamp(1.0, 99.0)
}

/// Signal-agreement score in 0..=4:
/// +2 when the core estimate and news point the same way (both nonzero),
/// +1 for a strong news signal, +1 for a decisive core estimate.
pub fn alignment_score(vectors: &SignalVector) -> u8 {
    let mut score = 0;

    let core_lean = vectors.core_ai_score - 50.0;
    if sign(core_lean) != 0 && sign(core_lean) == sign(vectors.news_score) {
        score += 2;
    }
    if vectors.news_score.abs() > 50.0 {
        score += 1;
    }
    if core_lean.abs() > 20.0 {
        score += 1;
    }

    score
}

/// Model price and market price favor opposite sides of 50%.
pub fn is_contrarian(model_price: f64, market_probability: f64) -> bool {
    sign(model_price - 50.0) * sign(market_probability - 50.0) < 0
}

/// Weight given to the model price versus the raw market price.
///
/// A near-certain market (>90 or <10) is only overridden on near-unanimous
/// signal agreement; a contrarian blend below that bar gets confidence 0.10.
pub fn confidence_factor(model_price: f64, market_probability: f64, alignment: u8) -> f64 {
    let contrarian = is_contrarian(model_price, market_probability);
    let extreme = market_probability > 90.0 || market_probability < 10.0;

    if extreme && contrarian && alignment < 3 {
        return 0.10;
    }

    if alignment >= 3 {
        0.90
    } else if alignment >= 2 {
        0.70
    } else if contrarian {
        0.30
    } else {
        0.50
    }
}

fn label_for(divergence: i64) -> PricingLabel {
    if divergence > LABEL_THRESHOLD {
        PricingLabel::Underpriced
    } else if divergence < -LABEL_THRESHOLD {
        PricingLabel::Overpriced
    } else {
        PricingLabel::FairlyPriced
    }
}

fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Final-blend rounding. Midpoints round down: a 87.5 blend of a 95 market
/// against a low-confidence model lands on 87, not 88.
fn round_half_down(x: f64) -> f64 {
    (x - 0.5).ceil()
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Per-option input to the blend.
#[derive(Debug, Clone)]
pub struct BlendInput {
    pub option: String,
    /// Market-implied probability, integer percent [0, 100].
    pub market_probability: i64,
    pub image: Option<String>,
    pub vectors: SignalVector,
}

/// Blend one option. Pure: identical inputs always produce identical output.
pub fn blend(
    event_type: EventType,
    input: BlendInput,
    model_rationale: Option<&str>,
) -> AnalysisOption {
    let weights = weights_for(event_type);
    let market = input.market_probability as f64;

    let model = model_price(&input.vectors, weights);
    let alignment = alignment_score(&input.vectors);
    let confidence = confidence_factor(model, market, alignment);

    let blended = round_half_down(model * confidence + market * (1.0 - confidence));
    let ai_score = (blended as i64).clamp(0, 100);
    let divergence = ai_score - input.market_probability;
    let label = label_for(divergence);

    let note = build_note(label, divergence, confidence, &input.vectors, model_rationale);

    AnalysisOption {
        option: input.option,
        market_probability: input.market_probability,
        ai_score,
        pricing_label: label,
        pricing_deviation: divergence,
        note,
        image: input.image,
        vectors: input.vectors,
    }
}

/// Short human-readable rationale for the verdict.
fn build_note(
    label: PricingLabel,
    divergence: i64,
    confidence: f64,
    vectors: &SignalVector,
    model_rationale: Option<&str>,
) -> String {
    let mut note = match label {
        PricingLabel::Underpriced => {
            format!("Signals point {divergence:+} pts above the market price")
        }
        PricingLabel::Overpriced => {
            format!("Signals point {divergence:+} pts below the market price")
        }
        PricingLabel::FairlyPriced => "Signals broadly agree with the market price".to_string(),
    };

    let mut drivers: Vec<&str> = Vec::new();
    if vectors.news_score >= 50.0 {
        drivers.push("strong news support");
    } else if vectors.news_score <= -50.0 {
        drivers.push("negative news pressure");
    }
    if vectors.momentum_score >= 50.0 {
        drivers.push("heavy buy-side momentum");
    } else if vectors.momentum_score <= -50.0 {
        drivers.push("heavy sell-side momentum");
    }
    if vectors.social_score >= 50.0 {
        drivers.push("bullish social chatter");
    } else if vectors.social_score <= -50.0 {
        drivers.push("bearish social chatter");
    }

    if !drivers.is_empty() {
        note.push_str(&format!(" ({})", drivers.join(", ")));
    }
    if confidence <= 0.10 {
        note.push_str("; near-certain market, low override confidence");
    }
    if let Some(rationale) = model_rationale {
        note.push_str(&format!(". Model: {rationale}"));
    }

    note
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
