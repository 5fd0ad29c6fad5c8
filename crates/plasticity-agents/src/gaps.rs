//! Type distribution and capability-gap analysis.
//!
//! Shares are percentages of the active population. Every type appears in
//! the distribution; types with no active agents have a share of zero, so
//! an empty population reports every type as a gap.

use std::collections::BTreeMap;

use plasticity_types::{Agent, AgentType, PopulationStats};
use rust_decimal::Decimal;

/// Active agent count per type. Every type is present.
pub fn type_counts<'a>(agents: impl IntoIterator<Item = &'a Agent>) -> BTreeMap<AgentType, u32> {
    let mut counts: BTreeMap<AgentType, u32> = AgentType::ALL.into_iter().map(|t| (t, 0)).collect();
    for agent in agents.into_iter().filter(|a| a.is_active()) {
        if let Some(count) = counts.get_mut(&agent.agent_type) {
            *count = count.saturating_add(1);
        }
    }
    counts
}

/// Percentage share of each type in the active population.
pub fn type_distribution(agents: &[Agent]) -> BTreeMap<AgentType, Decimal> {
    let counts = type_counts(agents);
    let total: u32 = counts.values().copied().fold(0, u32::saturating_add);
    counts
        .into_iter()
        .map(|(agent_type, count)| {
            let share = if total == 0 {
                Decimal::ZERO
            } else {
                Decimal::from(count)
                    .saturating_mul(Decimal::ONE_HUNDRED)
                    .checked_div(Decimal::from(total))
                    .unwrap_or(Decimal::ZERO)
            };
            (agent_type, share)
        })
        .collect()
}

/// Types whose share is strictly below `threshold_pct`, in [`AgentType::ALL`]
/// order.
pub fn under_represented(
    distribution: &BTreeMap<AgentType, Decimal>,
    threshold_pct: Decimal,
) -> Vec<AgentType> {
    AgentType::ALL
        .into_iter()
        .filter(|t| distribution.get(t).copied().unwrap_or(Decimal::ZERO) < threshold_pct)
        .collect()
}

/// Census of a full agent listing, active and destroyed.
pub fn population_stats(agents: &[Agent]) -> PopulationStats {
    let by_type = type_counts(agents);
    let mut active: u32 = 0;
    let mut destroyed: u32 = 0;
    let mut score_sum = Decimal::ZERO;
    for agent in agents {
        if agent.is_active() {
            active = active.saturating_add(1);
            score_sum = score_sum.saturating_add(agent.performance_score);
        } else {
            destroyed = destroyed.saturating_add(1);
        }
    }
    let mean_score = if active == 0 {
        Decimal::ZERO
    } else {
        score_sum
            .checked_div(Decimal::from(active))
            .unwrap_or(Decimal::ZERO)
            .round_dp(2)
    };
    PopulationStats {
        active,
        destroyed,
        by_type,
        mean_score,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::Utc;
    use plasticity_types::CreationReason;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::blueprint::{AgentBlueprint, build_agent};
    use crate::random::FixedRandom;

    fn agent(agent_type: AgentType, score: Decimal) -> Agent {
        let blueprint = AgentBlueprint::new(agent_type, CreationReason::Seed, score, dec!(0));
        build_agent(&blueprint, &mut FixedRandom::always(), Utc::now())
    }

    fn population(counts: &[(AgentType, usize)]) -> Vec<Agent> {
        counts
            .iter()
            .flat_map(|(t, n)| (0..*n).map(|_| agent(*t, dec!(60))))
            .collect()
    }

    #[test]
    fn twenty_agents_one_negotiator() {
        let agents = population(&[
            (AgentType::MarketAgent, 5),
            (AgentType::StrategyAgent, 5),
            (AgentType::ResourceAgent, 5),
            (AgentType::NegotiationAgent, 1),
            (AgentType::PerformanceAgent, 4),
        ]);
        let dist = type_distribution(&agents);
        assert_eq!(dist[&AgentType::NegotiationAgent], dec!(5));
        assert_eq!(dist[&AgentType::PerformanceAgent], dec!(20));
        assert_eq!(
            under_represented(&dist, dec!(15)),
            vec![AgentType::NegotiationAgent]
        );
    }

    #[test]
    fn absent_types_have_zero_share() {
        let agents = population(&[(AgentType::MarketAgent, 3)]);
        let dist = type_distribution(&agents);
        assert_eq!(dist.len(), AgentType::ALL.len());
        assert_eq!(dist[&AgentType::StrategyAgent], Decimal::ZERO);
        assert_eq!(under_represented(&dist, dec!(15)).len(), 4);
    }

    #[test]
    fn empty_population_is_all_gaps() {
        let dist = type_distribution(&[]);
        assert_eq!(under_represented(&dist, dec!(15)), AgentType::ALL.to_vec());
    }

    #[test]
    fn share_at_threshold_is_not_a_gap() {
        // 3 of 20 = 15%
        let agents = population(&[
            (AgentType::MarketAgent, 5),
            (AgentType::StrategyAgent, 4),
            (AgentType::ResourceAgent, 4),
            (AgentType::NegotiationAgent, 3),
            (AgentType::PerformanceAgent, 4),
        ]);
        let dist = type_distribution(&agents);
        assert!(under_represented(&dist, dec!(15)).is_empty());
    }

    #[test]
    fn destroyed_agents_are_excluded() {
        let mut agents = population(&[
            (AgentType::MarketAgent, 1),
            (AgentType::StrategyAgent, 1),
        ]);
        agents[0].destroyed_at = Some(Utc::now());
        let dist = type_distribution(&agents);
        assert_eq!(dist[&AgentType::MarketAgent], Decimal::ZERO);
        assert_eq!(dist[&AgentType::StrategyAgent], dec!(100));

        let stats = population_stats(&agents);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.destroyed, 1);
        assert_eq!(stats.by_type[&AgentType::MarketAgent], 0);
    }

    #[test]
    fn mean_score_of_active_agents() {
        let agents = vec![
            agent(AgentType::MarketAgent, dec!(90)),
            agent(AgentType::MarketAgent, dec!(70)),
        ];
        assert_eq!(population_stats(&agents).mean_score, dec!(80));
        assert_eq!(population_stats(&[]).mean_score, Decimal::ZERO);
    }
}
