//! In-memory agent store.
//!
//! Both maps sit behind one `tokio::sync::RwLock`, so every
//! read-modify-write of an agent or relationship is serialized. Insertion
//! order is tracked separately so listings are stable across runs.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use plasticity_types::{Agent, AgentId, Relationship, RelationshipId, RelationshipType};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::store::AgentStore;

#[derive(Debug, Default)]
struct StoreState {
    agents: BTreeMap<AgentId, Agent>,
    agent_order: Vec<AgentId>,
    relationships: Vec<Relationship>,
    pairs: BTreeSet<(AgentId, AgentId, RelationshipType)>,
}

impl StoreState {
    fn active_agent_mut(&mut self, id: AgentId) -> Result<&mut Agent, StoreError> {
        let agent = self
            .agents
            .get_mut(&id)
            .ok_or(StoreError::AgentNotFound(id))?;
        if agent.is_active() {
            Ok(agent)
        } else {
            Err(StoreError::AgentDestroyed(id))
        }
    }

    fn require_active(&self, id: AgentId) -> Result<(), StoreError> {
        match self.agents.get(&id) {
            None => Err(StoreError::AgentNotFound(id)),
            Some(agent) if !agent.is_active() => Err(StoreError::AgentDestroyed(id)),
            Some(_) => Ok(()),
        }
    }

    fn ordered(&self) -> impl Iterator<Item = &Agent> {
        self.agent_order.iter().filter_map(|id| self.agents.get(id))
    }
}

/// An agent store held entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryAgentStore {
    state: RwLock<StoreState>,
}

impl InMemoryAgentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_score(agent_id: AgentId, score: Decimal) -> Result<(), StoreError> {
    if score < Decimal::ZERO || score > Decimal::ONE_HUNDRED {
        return Err(StoreError::InvalidScore { agent_id, score });
    }
    Ok(())
}

fn check_strength(strength: Decimal) -> Result<(), StoreError> {
    if strength < Decimal::ZERO || strength > Decimal::ONE {
        return Err(StoreError::InvalidStrength(strength));
    }
    Ok(())
}

impl AgentStore for InMemoryAgentStore {
    async fn active_agents(&self) -> Result<Vec<Agent>, StoreError> {
        let state = self.state.read().await;
        Ok(state.ordered().filter(|a| a.is_active()).cloned().collect())
    }

    async fn all_agents(&self) -> Result<Vec<Agent>, StoreError> {
        let state = self.state.read().await;
        Ok(state.ordered().cloned().collect())
    }

    async fn get_agent(&self, id: AgentId) -> Result<Agent, StoreError> {
        let state = self.state.read().await;
        state
            .agents
            .get(&id)
            .cloned()
            .ok_or(StoreError::AgentNotFound(id))
    }

    async fn insert_agent(&self, agent: Agent) -> Result<(), StoreError> {
        check_score(agent.id, agent.performance_score)?;
        let mut state = self.state.write().await;
        if state.agents.contains_key(&agent.id) {
            return Err(StoreError::DuplicateAgent(agent.id));
        }
        debug!(agent_id = %agent.id, agent_type = %agent.agent_type, "Agent stored");
        state.agent_order.push(agent.id);
        state.agents.insert(agent.id, agent);
        Ok(())
    }

    async fn update_performance(&self, id: AgentId, score: Decimal) -> Result<Agent, StoreError> {
        check_score(id, score)?;
        let mut state = self.state.write().await;
        let agent = state.active_agent_mut(id)?;
        agent.performance_score = score;
        Ok(agent.clone())
    }

    async fn update_computational(&self, id: AgentId, computational: u32) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let agent = state.active_agent_mut(id)?;
        agent.resources.computational = computational;
        Ok(())
    }

    async fn mark_destroyed(&self, id: AgentId, at: DateTime<Utc>) -> Result<Agent, StoreError> {
        let mut state = self.state.write().await;
        let agent = state.active_agent_mut(id)?;
        agent.destroyed_at = Some(at);
        Ok(agent.clone())
    }

    async fn relationships(
        &self,
        relationship_type: RelationshipType,
    ) -> Result<Vec<Relationship>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .relationships
            .iter()
            .filter(|r| r.relationship_type == relationship_type)
            .cloned()
            .collect())
    }

    async fn insert_relationship(&self, relationship: Relationship) -> Result<(), StoreError> {
        if relationship.source_id == relationship.target_id {
            return Err(StoreError::SelfRelationship(relationship.source_id));
        }
        check_strength(relationship.strength)?;

        let mut state = self.state.write().await;
        state.require_active(relationship.source_id)?;
        state.require_active(relationship.target_id)?;

        let (a, b) = relationship.pair_key();
        if !state.pairs.insert((a, b, relationship.relationship_type)) {
            return Err(StoreError::DuplicateRelationship {
                a,
                b,
                relationship_type: relationship.relationship_type,
            });
        }
        state.relationships.push(relationship);
        Ok(())
    }

    async fn update_strength(
        &self,
        id: RelationshipId,
        strength: Decimal,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        check_strength(strength)?;
        let mut state = self.state.write().await;
        let relationship = state
            .relationships
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::RelationshipNotFound(id))?;
        if relationship.relationship_type != RelationshipType::Collaboration {
            return Err(StoreError::ImmutableRelationship {
                id,
                relationship_type: relationship.relationship_type,
            });
        }
        relationship.strength = strength;
        relationship.updated_at = at;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use plasticity_types::{AgentResources, AgentStrategy, AgentType, CreationReason};
    use rust_decimal_macros::dec;

    use super::*;

    fn agent(score: Decimal) -> Agent {
        Agent {
            id: AgentId::new(),
            name: String::from("Scout-Alpha"),
            agent_type: AgentType::MarketAgent,
            performance_score: score,
            cash_flow: dec!(0),
            resources: AgentResources {
                computational: 50,
                memory_mb: 512,
                api_quota_per_hour: 200,
            },
            strategy: AgentStrategy {
                focus: String::from("market_analysis"),
                risk_tolerance: dec!(0.4),
                planning_horizon_days: 30,
                objectives: Vec::new(),
            },
            parent_id: None,
            creation_reason: CreationReason::Seed,
            created_at: Utc::now(),
            destroyed_at: None,
        }
    }

    async fn store_with(agents: &[Agent]) -> InMemoryAgentStore {
        let store = InMemoryAgentStore::new();
        for a in agents {
            store.insert_agent(a.clone()).await.unwrap();
        }
        store
    }

    fn collab(a: AgentId, b: AgentId, strength: Decimal) -> Relationship {
        Relationship::new(a, b, RelationshipType::Collaboration, strength, Utc::now())
    }

    #[tokio::test]
    async fn destroyed_agents_leave_active_set() {
        let a = agent(dec!(60));
        let b = agent(dec!(70));
        let store = store_with(&[a.clone(), b.clone()]).await;

        store.mark_destroyed(a.id, Utc::now()).await.unwrap();

        let active = store.active_agents().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, b.id);
        assert_eq!(store.all_agents().await.unwrap().len(), 2);
        assert!(store.get_agent(a.id).await.unwrap().destroyed_at.is_some());
    }

    #[tokio::test]
    async fn destroyed_agents_reject_mutation() {
        let a = agent(dec!(60));
        let store = store_with(std::slice::from_ref(&a)).await;
        let first = store.mark_destroyed(a.id, Utc::now()).await.unwrap();

        assert_eq!(
            store.mark_destroyed(a.id, Utc::now()).await,
            Err(StoreError::AgentDestroyed(a.id))
        );
        assert_eq!(
            store.update_performance(a.id, dec!(90)).await,
            Err(StoreError::AgentDestroyed(a.id))
        );
        assert_eq!(
            store.update_computational(a.id, 100).await,
            Err(StoreError::AgentDestroyed(a.id))
        );
        assert_eq!(
            store.get_agent(a.id).await.unwrap().destroyed_at,
            first.destroyed_at
        );
    }

    #[tokio::test]
    async fn active_agents_keep_insertion_order() {
        let agents: Vec<Agent> = (0..5).map(|_| agent(dec!(60))).collect();
        let store = store_with(&agents).await;
        let ids: Vec<AgentId> = store
            .active_agents()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        let expected: Vec<AgentId> = agents.iter().map(|a| a.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn duplicate_pair_rejected_in_either_direction() {
        let a = agent(dec!(60));
        let b = agent(dec!(60));
        let store = store_with(&[a.clone(), b.clone()]).await;

        store
            .insert_relationship(collab(a.id, b.id, dec!(0.5)))
            .await
            .unwrap();
        let err = store
            .insert_relationship(collab(b.id, a.id, dec!(0.3)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateRelationship { .. }));

        // A different type on the same pair is allowed.
        store
            .insert_relationship(Relationship::new(
                a.id,
                b.id,
                RelationshipType::ParentChild,
                dec!(0.9),
                Utc::now(),
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn relationship_endpoints_must_be_active() {
        let a = agent(dec!(60));
        let b = agent(dec!(60));
        let store = store_with(&[a.clone(), b.clone()]).await;
        store.mark_destroyed(b.id, Utc::now()).await.unwrap();

        assert_eq!(
            store
                .insert_relationship(collab(a.id, b.id, dec!(0.5)))
                .await,
            Err(StoreError::AgentDestroyed(b.id))
        );
        let missing = AgentId::new();
        assert_eq!(
            store
                .insert_relationship(collab(a.id, missing, dec!(0.5)))
                .await,
            Err(StoreError::AgentNotFound(missing))
        );
        assert_eq!(
            store
                .insert_relationship(collab(a.id, a.id, dec!(0.5)))
                .await,
            Err(StoreError::SelfRelationship(a.id))
        );
    }

    #[tokio::test]
    async fn only_collaboration_strength_is_mutable() {
        let a = agent(dec!(60));
        let b = agent(dec!(60));
        let store = store_with(&[a.clone(), b.clone()]).await;
        let lineage = Relationship::new(
            a.id,
            b.id,
            RelationshipType::ParentChild,
            dec!(0.9),
            Utc::now(),
        );
        let lineage_id = lineage.id;
        store.insert_relationship(lineage).await.unwrap();
        let err = store
            .update_strength(lineage_id, dec!(1), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ImmutableRelationship { .. }));

        let peer = collab(a.id, b.id, dec!(0.5));
        let peer_id = peer.id;
        store.insert_relationship(peer).await.unwrap();
        store
            .update_strength(peer_id, dec!(0.58), Utc::now())
            .await
            .unwrap();
        assert_eq!(
            store
                .update_strength(peer_id, dec!(1.2), Utc::now())
                .await,
            Err(StoreError::InvalidStrength(dec!(1.2)))
        );
        let collabs = store
            .relationships(RelationshipType::Collaboration)
            .await
            .unwrap();
        assert_eq!(collabs.len(), 1);
        assert_eq!(collabs[0].strength, dec!(0.58));
    }

    #[tokio::test]
    async fn score_writes_are_range_checked() {
        let a = agent(dec!(60));
        let store = store_with(std::slice::from_ref(&a)).await;
        assert!(matches!(
            store.update_performance(a.id, dec!(101)).await,
            Err(StoreError::InvalidScore { .. })
        ));
        let updated = store.update_performance(a.id, dec!(72.5)).await.unwrap();
        assert_eq!(updated.performance_score, dec!(72.5));
    }

    #[tokio::test]
    async fn inserted_scores_are_range_checked() {
        let store = InMemoryAgentStore::new();
        let too_high = agent(dec!(150));
        assert_eq!(
            store.insert_agent(too_high.clone()).await,
            Err(StoreError::InvalidScore {
                agent_id: too_high.id,
                score: dec!(150),
            })
        );
        let negative = agent(dec!(-1));
        assert!(matches!(
            store.insert_agent(negative).await,
            Err(StoreError::InvalidScore { .. })
        ));
        assert!(store.all_agents().await.unwrap().is_empty());

        store.insert_agent(agent(dec!(100))).await.unwrap();
        store.insert_agent(agent(Decimal::ZERO)).await.unwrap();
        assert_eq!(store.all_agents().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_agent_rejected() {
        let a = agent(dec!(60));
        let store = store_with(std::slice::from_ref(&a)).await;
        assert_eq!(
            store.insert_agent(a.clone()).await,
            Err(StoreError::DuplicateAgent(a.id))
        );
    }
}
