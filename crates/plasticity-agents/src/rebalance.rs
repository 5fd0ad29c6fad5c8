//! Performance-tier computational allocation.
//!
//! High performers get the high allocation, low performers the low one,
//! and everyone in between keeps whatever they have. This is a clamp per
//! agent, not a redistribution of a fixed pool.

use rust_decimal::Decimal;

use crate::config::RebalanceConfig;

/// The computational budget an agent with `score` should have, or `None`
/// when its current allocation is left alone.
pub fn target_allocation(score: Decimal, config: &RebalanceConfig) -> Option<u32> {
    if score > config.high_score {
        Some(config.high_allocation)
    } else if score < config.low_score {
        Some(config.low_allocation)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn tiers() {
        let config = RebalanceConfig::default();
        assert_eq!(target_allocation(dec!(85), &config), Some(100));
        assert_eq!(target_allocation(dec!(25), &config), Some(20));
        assert_eq!(target_allocation(dec!(55), &config), None);
    }

    #[test]
    fn boundaries_are_untouched() {
        let config = RebalanceConfig::default();
        assert_eq!(target_allocation(dec!(80), &config), None);
        assert_eq!(target_allocation(dec!(30), &config), None);
    }
}
