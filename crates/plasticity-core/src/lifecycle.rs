//! Applying lifecycle decisions against the store.
//!
//! Destroying sets `destroyed_at` and publishes `agent_destroyed`.
//! Spawning creates a descendant of a complementary type, links it to the
//! parent with a `parent-child` edge, and publishes `agent_created`. The
//! parent itself is not changed. A rejected parent-child edge is logged
//! and dropped; the descendant stays.

use chrono::Utc;
use plasticity_agents::{
    AgentBlueprint, LifecycleDecision, RandomSource, decide, pick_descendant_type,
};
use plasticity_db::{AgentStore, MetricSource};
use plasticity_types::{
    Agent, AgentDestroyedDetails, AgentId, DestroyReason, EventDetails, Relationship,
    RelationshipType,
};
use tracing::{info, warn};

use crate::control_loop::ControlLoop;
use crate::error::ControlError;
use crate::events::EventPublisher;

/// What happened to an agent after its lifecycle decision was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleOutcome {
    /// No change.
    Retained,
    /// The agent was destroyed.
    Destroyed,
    /// A descendant was created.
    Spawned,
    /// A spawn was decided but the population cap was reached.
    SpawnBlocked,
}

impl<S, M, P, R> ControlLoop<S, M, P, R>
where
    S: AgentStore,
    M: MetricSource,
    P: EventPublisher,
    R: RandomSource + Send,
{
    /// Decide and apply the fate of a freshly evaluated agent. `active` is
    /// the current active population size, for the population cap.
    pub(crate) async fn apply_lifecycle(
        &mut self,
        agent: &Agent,
        active: usize,
    ) -> Result<LifecycleOutcome, ControlError> {
        let decision = decide(
            agent.performance_score,
            agent.cash_flow,
            &self.config.lifecycle,
            &mut self.rng,
        );
        match decision {
            LifecycleDecision::Retain => Ok(LifecycleOutcome::Retained),
            LifecycleDecision::Destroy(reason) => {
                self.destroy_agent(agent, reason).await?;
                Ok(LifecycleOutcome::Destroyed)
            }
            LifecycleDecision::Spawn if !self.config.lifecycle.has_capacity(active) => {
                info!(
                    agent_id = %agent.id,
                    active,
                    max_population = self.config.lifecycle.max_population,
                    "Population cap reached, descendant not spawned"
                );
                Ok(LifecycleOutcome::SpawnBlocked)
            }
            LifecycleDecision::Spawn => {
                self.spawn_descendant(agent).await?;
                Ok(LifecycleOutcome::Spawned)
            }
        }
    }

    async fn destroy_agent(&self, agent: &Agent, reason: DestroyReason) -> Result<(), ControlError> {
        let destroyed = self
            .guarded("mark_destroyed", self.store.mark_destroyed(agent.id, Utc::now()))
            .await?;
        info!(
            agent_id = %agent.id,
            name = %agent.name,
            agent_type = %agent.agent_type,
            %reason,
            score = %destroyed.performance_score,
            cash_flow = %destroyed.cash_flow,
            "Agent destroyed"
        );
        self.emit(
            agent.id,
            EventDetails::AgentDestroyed(AgentDestroyedDetails {
                reason,
                final_score: destroyed.performance_score,
                cash_flow: destroyed.cash_flow,
            }),
        );
        Ok(())
    }

    async fn spawn_descendant(&mut self, parent: &Agent) -> Result<AgentId, ControlError> {
        let child_type = pick_descendant_type(parent.agent_type, &self.config.lifecycle, &mut self.rng);
        let blueprint = AgentBlueprint::descendant(child_type, parent.id, &self.config.lifecycle);
        let child = self.create_agent(&blueprint).await?;

        let link = Relationship::new(
            parent.id,
            child.id,
            RelationshipType::ParentChild,
            self.config.lifecycle.parent_child_strength,
            child.created_at,
        );
        if let Err(e) = self
            .guarded("insert_relationship", self.store.insert_relationship(link))
            .await
        {
            warn!(
                parent_id = %parent.id,
                child_id = %child.id,
                error = %e,
                "Parent-child relationship rejected"
            );
        }

        info!(
            parent_id = %parent.id,
            child_id = %child.id,
            name = %child.name,
            agent_type = %child.agent_type,
            "Descendant spawned"
        );
        self.announce_created(&child);
        Ok(child.id)
    }
}
