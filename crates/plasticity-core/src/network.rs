//! The network optimization tick: reinforce collaboration edges, then
//! rebalance computational allocations.
//!
//! Only edges with both endpoints in the active population are touched.
//! Edges to a destroyed or missing agent are skipped without error.
//! Parent-child edges are never read here.

use std::collections::BTreeMap;

use chrono::Utc;
use plasticity_agents::{RandomSource, reinforced_strength, target_allocation};
use plasticity_db::{AgentStore, MetricSource};
use plasticity_types::{Agent, AgentId, RelationshipType};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::control_loop::{ControlLoop, next_tick};
use crate::events::EventPublisher;
use crate::summary::NetworkSummary;

impl<S, M, P, R> ControlLoop<S, M, P, R>
where
    S: AgentStore,
    M: MetricSource,
    P: EventPublisher,
    R: RandomSource + Send,
{
    /// Run one network optimization tick.
    ///
    /// Never fails: collaborator errors are logged and counted in
    /// [`NetworkSummary::failures`].
    pub async fn run_network_tick(&mut self) -> NetworkSummary {
        let tick = next_tick(&mut self.counters.optimization);
        let mut summary = NetworkSummary {
            tick,
            ..NetworkSummary::default()
        };

        let agents = match self.guarded("active_agents", self.store.active_agents()).await {
            Ok(agents) => agents,
            Err(e) => {
                warn!(tick, error = %e, "Network tick could not list agents");
                summary.failures = 1;
                return summary;
            }
        };
        info!(tick, agents = agents.len(), "Network optimization tick starting");

        let scores: BTreeMap<AgentId, Decimal> = agents
            .iter()
            .map(|a| (a.id, a.performance_score))
            .collect();
        self.reinforce_collaborations(&scores, &mut summary).await;
        self.rebalance_resources(&agents, &mut summary).await;

        info!(
            tick,
            strengthened = summary.strengthened,
            unchanged = summary.unchanged,
            skipped_inactive = summary.skipped_inactive,
            rebalanced = summary.rebalanced,
            failures = summary.failures,
            "Network optimization tick complete"
        );
        summary
    }

    async fn reinforce_collaborations(
        &self,
        scores: &BTreeMap<AgentId, Decimal>,
        summary: &mut NetworkSummary,
    ) {
        let relationships = match self
            .guarded(
                "relationships",
                self.store.relationships(RelationshipType::Collaboration),
            )
            .await
        {
            Ok(relationships) => relationships,
            Err(e) => {
                warn!(tick = summary.tick, error = %e, "Could not list collaborations");
                summary.failures = summary.failures.saturating_add(1);
                return;
            }
        };

        for relationship in relationships {
            let (Some(a), Some(b)) = (
                scores.get(&relationship.source_id),
                scores.get(&relationship.target_id),
            ) else {
                debug!(
                    relationship_id = %relationship.id,
                    "Skipping collaboration with inactive endpoint"
                );
                summary.skipped_inactive = summary.skipped_inactive.saturating_add(1);
                continue;
            };

            let strength = reinforced_strength(relationship.strength, *a, *b, &self.config.network);
            if strength == relationship.strength {
                summary.unchanged = summary.unchanged.saturating_add(1);
                continue;
            }

            match self
                .guarded(
                    "update_strength",
                    self.store.update_strength(relationship.id, strength, Utc::now()),
                )
                .await
            {
                Ok(()) => {
                    debug!(
                        relationship_id = %relationship.id,
                        previous = %relationship.strength,
                        strength = %strength,
                        "Collaboration strengthened"
                    );
                    summary.strengthened = summary.strengthened.saturating_add(1);
                }
                Err(e) => {
                    warn!(relationship_id = %relationship.id, error = %e, "Strength update failed, skipping");
                    summary.failures = summary.failures.saturating_add(1);
                }
            }
        }
    }

    async fn rebalance_resources(&self, agents: &[Agent], summary: &mut NetworkSummary) {
        for agent in agents {
            let Some(target) = target_allocation(agent.performance_score, &self.config.rebalance)
            else {
                continue;
            };
            if target == agent.resources.computational {
                continue;
            }
            match self
                .guarded(
                    "update_computational",
                    self.store.update_computational(agent.id, target),
                )
                .await
            {
                Ok(()) => {
                    debug!(
                        agent_id = %agent.id,
                        score = %agent.performance_score,
                        previous = agent.resources.computational,
                        computational = target,
                        "Resources rebalanced"
                    );
                    summary.rebalanced = summary.rebalanced.saturating_add(1);
                }
                Err(e) => {
                    warn!(agent_id = %agent.id, error = %e, "Rebalance failed, skipping agent");
                    summary.failures = summary.failures.saturating_add(1);
                }
            }
        }
    }
}
