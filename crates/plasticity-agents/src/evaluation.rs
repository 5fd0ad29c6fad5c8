//! Performance scoring from weighted metric averages.
//!
//! The new score starts from the current score and adds each recognised
//! metric's average multiplied by its weight. Unrecognised names and
//! metrics without a weight contribute nothing. The result is clamped to
//! `0..=100`. Arithmetic saturates so extreme inputs still clamp instead
//! of overflowing.

use plasticity_types::{MetricAverage, MetricName};
use rust_decimal::Decimal;

use crate::config::EvaluationConfig;

/// Lowest possible performance score.
pub const MIN_SCORE: Decimal = Decimal::ZERO;

/// Highest possible performance score.
pub const MAX_SCORE: Decimal = Decimal::ONE_HUNDRED;

/// Compute an agent's new score.
///
/// Total and idempotent for the same inputs: an empty metric set returns
/// the current score (clamped).
pub fn evaluate_score(
    current: Decimal,
    metrics: &[MetricAverage],
    config: &EvaluationConfig,
) -> Decimal {
    let score = metrics.iter().fold(current, |acc, metric| {
        let Some(name) = MetricName::from_name(&metric.metric_name) else {
            return acc;
        };
        acc.saturating_add(metric.value.saturating_mul(config.weight(name)))
    });
    clamp_score(score)
}

/// Clamp a score to `0..=100`.
pub fn clamp_score(score: Decimal) -> Decimal {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn metric(name: &str, value: Decimal) -> MetricAverage {
        MetricAverage::new(name, value)
    }

    #[test]
    fn weighted_sum_added_to_current() {
        let config = EvaluationConfig::default();
        let metrics = [
            metric("revenue_growth", dec!(10)),
            metric("cost_efficiency", dec!(5)),
            metric("customer_satisfaction", dec!(4)),
            metric("market_share", dec!(8)),
            metric("innovation_index", dec!(10)),
        ];
        // 3.0 + 1.0 + 0.6 + 2.0 + 1.0 = 7.6
        assert_eq!(evaluate_score(dec!(60), &metrics, &config), dec!(67.6));
    }

    #[test]
    fn unknown_metrics_contribute_nothing() {
        let config = EvaluationConfig::default();
        let metrics = [metric("churn_rate", dec!(500)), metric("market_share", dec!(4))];
        assert_eq!(evaluate_score(dec!(70), &metrics, &config), dec!(71));
    }

    #[test]
    fn no_metrics_keeps_score() {
        let config = EvaluationConfig::default();
        assert_eq!(evaluate_score(dec!(42.5), &[], &config), dec!(42.5));
    }

    #[test]
    fn clamps_extreme_inputs() {
        let config = EvaluationConfig::default();
        let huge = [metric("revenue_growth", Decimal::MAX)];
        assert_eq!(evaluate_score(dec!(99), &huge, &config), MAX_SCORE);

        let tiny = [
            metric("revenue_growth", Decimal::MIN),
            metric("market_share", Decimal::MIN),
        ];
        assert_eq!(evaluate_score(dec!(1), &tiny, &config), MIN_SCORE);

        assert_eq!(evaluate_score(dec!(250), &[], &config), MAX_SCORE);
    }

    #[test]
    fn idempotent_for_same_inputs() {
        let config = EvaluationConfig::default();
        let metrics = [metric("revenue_growth", dec!(-12.5))];
        let first = evaluate_score(dec!(55), &metrics, &config);
        let second = evaluate_score(dec!(55), &metrics, &config);
        assert_eq!(first, second);
        assert_eq!(first, dec!(51.25));
    }
}
