//! Destroy / spawn / retain decision for one evaluated agent.
//!
//! The decision is a pure function of the new score, the agent's cash
//! flow, the tunables, and the random source. Draw consumption is part of
//! the contract so that a fixed seed reproduces the same decisions:
//!
//! 1. `score < destroy_score` destroys with no draw consumed.
//! 2. `cash_flow < cash_flow_risk_threshold` consumes one draw; a hit
//!    destroys for cash-flow risk.
//! 3. `score > spawn_score` and `cash_flow > spawn_cash_flow` consumes one
//!    draw; a hit spawns a descendant.
//! 4. Otherwise the agent is retained unchanged.

use plasticity_types::DestroyReason;
use rust_decimal::Decimal;

use crate::config::LifecycleConfig;
use crate::random::RandomSource;

/// What the lifecycle manager should do with an evaluated agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleDecision {
    /// Logically delete the agent.
    Destroy(DestroyReason),
    /// Create a descendant of the agent.
    Spawn,
    /// Leave the agent as it is.
    Retain,
}

/// Decide the fate of an agent after evaluation.
pub fn decide(
    score: Decimal,
    cash_flow: Decimal,
    config: &LifecycleConfig,
    rng: &mut impl RandomSource,
) -> LifecycleDecision {
    if score < config.destroy_score {
        return LifecycleDecision::Destroy(DestroyReason::PoorPerformance);
    }

    if cash_flow < config.cash_flow_risk_threshold
        && rng.chance(config.cash_flow_risk_probability)
    {
        return LifecycleDecision::Destroy(DestroyReason::CashFlowRisk);
    }

    if score > config.spawn_score
        && cash_flow > config.spawn_cash_flow
        && rng.chance(config.spawn_probability)
    {
        return LifecycleDecision::Spawn;
    }

    LifecycleDecision::Retain
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::random::{FixedRandom, SeededRandom};

    /// Counts draws so tests can check consumption.
    struct Counting<R> {
        inner: R,
        draws: u32,
    }

    impl<R: RandomSource> RandomSource for Counting<R> {
        fn next_unit(&mut self) -> f64 {
            self.draws = self.draws.saturating_add(1);
            self.inner.next_unit()
        }
        fn next_index(&mut self, len: usize) -> usize {
            self.inner.next_index(len)
        }
        fn next_in_range(&mut self, low: u32, high: u32) -> u32 {
            self.inner.next_in_range(low, high)
        }
    }

    #[test]
    fn low_score_destroys_without_a_draw() {
        let config = LifecycleConfig::default();
        let mut rng = Counting {
            inner: FixedRandom::never(),
            draws: 0,
        };
        let decision = decide(dec!(45), dec!(100_000), &config, &mut rng);
        assert_eq!(
            decision,
            LifecycleDecision::Destroy(DestroyReason::PoorPerformance)
        );
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn score_of_exactly_fifty_survives() {
        let config = LifecycleConfig::default();
        let decision = decide(dec!(50), dec!(0), &config, &mut FixedRandom::always());
        assert_eq!(decision, LifecycleDecision::Retain);
    }

    #[test]
    fn cash_flow_risk_depends_on_draw() {
        let config = LifecycleConfig::default();
        assert_eq!(
            decide(dec!(70), dec!(-1500), &config, &mut FixedRandom::always()),
            LifecycleDecision::Destroy(DestroyReason::CashFlowRisk)
        );
        assert_eq!(
            decide(dec!(70), dec!(-1500), &config, &mut FixedRandom::never()),
            LifecycleDecision::Retain
        );
        // 0.05 gate: a draw of 0.04 hits, 0.06 misses.
        assert_eq!(
            decide(dec!(70), dec!(-1500), &config, &mut FixedRandom::new(0.04)),
            LifecycleDecision::Destroy(DestroyReason::CashFlowRisk)
        );
        assert_eq!(
            decide(dec!(70), dec!(-1500), &config, &mut FixedRandom::new(0.06)),
            LifecycleDecision::Retain
        );
    }

    #[test]
    fn spawn_requires_score_cash_and_draw() {
        let config = LifecycleConfig::default();
        assert_eq!(
            decide(dec!(85), dec!(6000), &config, &mut FixedRandom::always()),
            LifecycleDecision::Spawn
        );
        assert_eq!(
            decide(dec!(85), dec!(6000), &config, &mut FixedRandom::never()),
            LifecycleDecision::Retain
        );
        assert_eq!(
            decide(dec!(80), dec!(6000), &config, &mut FixedRandom::always()),
            LifecycleDecision::Retain
        );
        assert_eq!(
            decide(dec!(85), dec!(5000), &config, &mut FixedRandom::always()),
            LifecycleDecision::Retain
        );
    }

    #[test]
    fn ordinary_agent_consumes_no_draw() {
        let config = LifecycleConfig::default();
        let mut rng = Counting {
            inner: FixedRandom::always(),
            draws: 0,
        };
        assert_eq!(
            decide(dec!(65), dec!(200), &config, &mut rng),
            LifecycleDecision::Retain
        );
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn fixed_seed_reproduces_decisions() {
        let config = LifecycleConfig::default();
        let inputs = [
            (dec!(90), dec!(9000)),
            (dec!(60), dec!(-5000)),
            (dec!(85), dec!(7000)),
            (dec!(40), dec!(0)),
            (dec!(95), dec!(10000)),
        ];
        let run = |seed| {
            let mut rng = SeededRandom::from_seed(seed);
            (0..50)
                .flat_map(|_| inputs.iter())
                .map(|(score, cash)| decide(*score, *cash, &config, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
    }
}
