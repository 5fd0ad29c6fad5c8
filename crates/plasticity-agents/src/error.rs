//! Error types for the plasticity-agents crate.
//!
//! The agent logic itself is total: scoring clamps and decisions always
//! return a variant. Errors here cover tunables that cannot be applied.

use rust_decimal::Decimal;

/// Errors raised when validating agent tunables.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AgentError {
    /// A probability outside `0.0..=1.0` was configured.
    #[error("invalid probability for {name}: {value} (must be within 0.0..=1.0)")]
    InvalidProbability {
        /// Which tunable was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A value fell outside its permitted range.
    #[error("{name} out of range: {value} (must be within {low}..={high})")]
    OutOfRange {
        /// Which tunable was rejected.
        name: &'static str,
        /// The rejected value.
        value: Decimal,
        /// Inclusive lower bound.
        low: Decimal,
        /// Inclusive upper bound.
        high: Decimal,
    },

    /// A pair of thresholds was configured with the low side above the high.
    #[error("invalid bounds for {name}: low {low} exceeds high {high}")]
    InvertedBounds {
        /// Which tunable pair was rejected.
        name: &'static str,
        /// Configured lower threshold.
        low: Decimal,
        /// Configured upper threshold.
        high: Decimal,
    },
}

/// Reject probabilities outside `0.0..=1.0` (including NaN).
///
/// # Errors
///
/// Returns [`AgentError::InvalidProbability`] when `value` is not a valid
/// probability.
pub fn check_probability(name: &'static str, value: f64) -> Result<(), AgentError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AgentError::InvalidProbability { name, value })
    }
}

/// Reject decimals outside `low..=high`.
///
/// # Errors
///
/// Returns [`AgentError::OutOfRange`] when `value` is outside the range.
pub fn check_range(
    name: &'static str,
    value: Decimal,
    low: Decimal,
    high: Decimal,
) -> Result<(), AgentError> {
    if value >= low && value <= high {
        Ok(())
    } else {
        Err(AgentError::OutOfRange {
            name,
            value,
            low,
            high,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn probability_bounds_are_inclusive() {
        assert!(check_probability("p", 0.0).is_ok());
        assert!(check_probability("p", 1.0).is_ok());
        assert!(check_probability("p", 1.01).is_err());
        assert!(check_probability("p", -0.1).is_err());
        assert!(check_probability("p", f64::NAN).is_err());
    }

    #[test]
    fn range_check_reports_bounds() {
        let err = check_range("strength", dec!(1.5), dec!(0), dec!(1));
        assert_eq!(
            err,
            Err(AgentError::OutOfRange {
                name: "strength",
                value: dec!(1.5),
                low: dec!(0),
                high: dec!(1),
            })
        );
    }
}
