use crate::models::{MarketOption, WhaleData};

/// Momentum score for an option: clamped price velocity, volume conviction,
/// and whale-wall pressure, with the total clamped to [-100, 100].
pub fn momentum_score(option: &MarketOption, whale_data: Option<WhaleData>) -> f64 {
    let velocity = (option.price_change_24h * 3.0).clamp(-40.0, 40.0);

    let conviction = if option.volume_share_percent > 50.0 {
        30.0
    } else if option.volume_share_percent > 25.0 {
        15.0
    } else if option.volume_share_percent < 5.0 {
        -10.0
    } else {
        0.0
    };

    let whale = match whale_data {
        Some(w) => {
            let mut term = 0.0;
            if w.buy_walls > 0 {
                term += 25.0;
            }
            if w.sell_walls > 0 {
                term -= 25.0;
            }
            term
        }
        None => 0.0,
    };

    (velocity + conviction + whale).clamp(-100.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(price_change_24h: f64, volume_share_percent: f64) -> MarketOption {
        MarketOption {
            name: "opt".into(),
            image: None,
            implied_probability: 0.5,
            volume_share_percent,
            price_change_24h,
        }
    }

    fn walls(buy: u32, sell: u32) -> WhaleData {
        WhaleData {
            buy_walls: buy,
            sell_walls: sell,
            total_walls: buy + sell,
        }
    }

    #[test]
    fn velocity_is_clamped_to_forty() {
        // +50% × 3 = 150 clamps to 40; a 50% share lands in the >25 bracket.
        assert_eq!(momentum_score(&option(50.0, 50.0), None), 55.0);
        assert_eq!(momentum_score(&option(-50.0, 50.0), None), -25.0);
    }

    #[test]
    fn volume_conviction_brackets() {
        assert_eq!(momentum_score(&option(0.0, 60.0), None), 30.0);
        assert_eq!(momentum_score(&option(0.0, 30.0), None), 15.0);
        assert_eq!(momentum_score(&option(0.0, 10.0), None), 0.0);
        assert_eq!(momentum_score(&option(0.0, 2.0), None), -10.0);
    }

    #[test]
    fn whale_terms_can_cancel() {
        assert_eq!(momentum_score(&option(0.0, 10.0), Some(walls(2, 0))), 25.0);
        assert_eq!(momentum_score(&option(0.0, 10.0), Some(walls(0, 1))), -25.0);
        // Both sides present: +25 and -25 both apply.
        assert_eq!(momentum_score(&option(0.0, 10.0), Some(walls(3, 2))), 0.0);
    }

    #[test]
    fn total_is_clamped() {
        // 40 + 30 + 25 = 95 stays; force the negative rail instead.
        let score = momentum_score(&option(-40.0, 2.0), Some(walls(0, 4)));
        assert_eq!(score, -75.0);
        assert!(momentum_score(&option(100.0, 60.0), Some(walls(1, 0))) <= 100.0);
    }
}
