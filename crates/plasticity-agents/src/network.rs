//! Collaboration strength reinforcement.
//!
//! Each optimization tick moves a collaboration edge towards 1.0 by the
//! endpoints' mean score (as a fraction) times the reinforcement rate:
//!
//! `strength' = min(1, strength + (mean(score_a, score_b) / 100) * rate)`
//!
//! The increment is never negative, so strength never decreases.

use rust_decimal::Decimal;

use crate::config::NetworkConfig;

/// Strength after one reinforcement step.
pub fn reinforced_strength(
    current: Decimal,
    score_a: Decimal,
    score_b: Decimal,
    config: &NetworkConfig,
) -> Decimal {
    let two = Decimal::TWO;
    let mean = score_a.saturating_add(score_b).checked_div(two).unwrap_or(Decimal::ZERO);
    let increment = mean
        .checked_div(Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO)
        .saturating_mul(config.reinforcement_rate)
        .max(Decimal::ZERO);
    current.saturating_add(increment).min(Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn mean_score_drives_increment() {
        let config = NetworkConfig::default();
        // mean 80 -> 0.8 * 0.1 = 0.08
        assert_eq!(
            reinforced_strength(dec!(0.5), dec!(90), dec!(70), &config),
            dec!(0.58)
        );
    }

    #[test]
    fn capped_at_one() {
        let config = NetworkConfig::default();
        assert_eq!(
            reinforced_strength(dec!(0.97), dec!(100), dec!(100), &config),
            Decimal::ONE
        );
        assert_eq!(
            reinforced_strength(Decimal::ONE, dec!(100), dec!(100), &config),
            Decimal::ONE
        );
    }

    #[test]
    fn never_decreases() {
        let config = NetworkConfig {
            reinforcement_rate: dec!(-0.5),
        };
        assert_eq!(
            reinforced_strength(dec!(0.4), dec!(90), dec!(90), &config),
            dec!(0.4)
        );
        let config = NetworkConfig::default();
        assert_eq!(
            reinforced_strength(dec!(0.4), dec!(0), dec!(0), &config),
            dec!(0.4)
        );
    }
}
