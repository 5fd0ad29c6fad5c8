//! Seed population bootstrap.
//!
//! On an empty store the engine creates `seed_per_type` agents of every
//! type with the configured starting score and cash flow, links every
//! pair of them with a collaboration edge, and announces each agent. A
//! store that already holds agents, active or destroyed, is left alone.

use chrono::Utc;
use plasticity_agents::{AgentBlueprint, RandomSource, build_agent};
use plasticity_core::EventPublisher;
use plasticity_core::config::PopulationConfig;
use plasticity_db::AgentStore;
use plasticity_types::{
    Agent, AgentCreatedDetails, AgentType, CreationReason, Event, EventDetails, Relationship,
    RelationshipType,
};
use tracing::{debug, info};

use crate::error::EngineError;

/// What the bootstrap created.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    /// Seed agents, in creation order.
    pub agents: Vec<Agent>,
    /// Collaboration edges created among them.
    pub collaborations: u32,
}

/// Create the seed population if the store is empty.
pub async fn seed_population<S, P>(
    store: &S,
    publisher: &P,
    config: &PopulationConfig,
    rng: &mut impl RandomSource,
) -> Result<SeedReport, EngineError>
where
    S: AgentStore,
    P: EventPublisher,
{
    let existing = store.all_agents().await?;
    if !existing.is_empty() {
        info!(agents = existing.len(), "Store already populated, skipping seed");
        return Ok(SeedReport::default());
    }

    let now = Utc::now();
    let mut report = SeedReport::default();
    for agent_type in AgentType::ALL {
        for _ in 0..config.seed_per_type {
            let blueprint = AgentBlueprint::new(
                agent_type,
                CreationReason::Seed,
                config.seed_score,
                config.seed_cash_flow,
            );
            let agent = build_agent(&blueprint, rng, now);
            store.insert_agent(agent.clone()).await?;
            debug!(agent_id = %agent.id, name = %agent.name, %agent_type, "Seed agent created");
            report.agents.push(agent);
        }
    }

    for (i, a) in report.agents.iter().enumerate() {
        for b in report.agents.iter().skip(i.saturating_add(1)) {
            let edge = Relationship::new(
                a.id,
                b.id,
                RelationshipType::Collaboration,
                config.collaboration_strength,
                now,
            );
            store.insert_relationship(edge).await?;
            report.collaborations = report.collaborations.saturating_add(1);
        }
    }

    for agent in &report.agents {
        publisher.publish(Event::new(
            agent.id,
            EventDetails::AgentCreated(AgentCreatedDetails {
                name: agent.name.clone(),
                agent_type: agent.agent_type,
                reason: agent.creation_reason,
                parent_id: None,
                performance_score: agent.performance_score,
                cash_flow: agent.cash_flow,
            }),
        ));
    }

    info!(
        agents = report.agents.len(),
        collaborations = report.collaborations,
        "Seed population created"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use plasticity_agents::SeededRandom;
    use plasticity_core::BroadcastPublisher;
    use plasticity_db::InMemoryAgentStore;
    use plasticity_types::EventType;
    use rust_decimal_macros::dec;

    use super::*;

    #[tokio::test]
    async fn seeds_one_of_each_type_with_a_full_mesh() {
        let store = InMemoryAgentStore::new();
        let publisher = BroadcastPublisher::new();
        let mut rx = publisher.subscribe();
        let mut rng = SeededRandom::from_seed(1);

        let report = seed_population(&store, &publisher, &PopulationConfig::default(), &mut rng)
            .await
            .unwrap();

        assert_eq!(report.agents.len(), 5);
        assert_eq!(report.collaborations, 10);
        for agent_type in AgentType::ALL {
            assert!(report.agents.iter().any(|a| a.agent_type == agent_type));
        }

        let agents = store.active_agents().await.unwrap();
        assert_eq!(agents.len(), 5);
        assert!(agents.iter().all(|a| a.performance_score == dec!(60)));
        assert!(agents.iter().all(|a| a.creation_reason == CreationReason::Seed));

        let edges = store
            .relationships(RelationshipType::Collaboration)
            .await
            .unwrap();
        assert_eq!(edges.len(), 10);
        assert!(edges.iter().all(|r| r.strength == dec!(0.5)));

        let mut created = 0;
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event.event_type(), EventType::AgentCreated);
            created += 1;
        }
        assert_eq!(created, 5);
    }

    #[tokio::test]
    async fn larger_seed_meshes_every_pair() {
        let store = InMemoryAgentStore::new();
        let config = PopulationConfig {
            seed_per_type: 2,
            ..PopulationConfig::default()
        };
        let report = seed_population(
            &store,
            &BroadcastPublisher::new(),
            &config,
            &mut SeededRandom::from_seed(2),
        )
        .await
        .unwrap();

        assert_eq!(report.agents.len(), 10);
        assert_eq!(report.collaborations, 45);
    }

    #[tokio::test]
    async fn populated_store_is_left_alone() {
        let store = InMemoryAgentStore::new();
        let publisher = BroadcastPublisher::new();
        let mut rng = SeededRandom::from_seed(3);
        seed_population(&store, &publisher, &PopulationConfig::default(), &mut rng)
            .await
            .unwrap();

        let again = seed_population(&store, &publisher, &PopulationConfig::default(), &mut rng)
            .await
            .unwrap();
        assert!(again.agents.is_empty());
        assert_eq!(store.all_agents().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn out_of_range_seed_score_is_refused() {
        let store = InMemoryAgentStore::new();
        let config = PopulationConfig {
            seed_score: dec!(150),
            ..PopulationConfig::default()
        };
        let result = seed_population(
            &store,
            &BroadcastPublisher::new(),
            &config,
            &mut SeededRandom::from_seed(5),
        )
        .await;

        assert!(matches!(
            result,
            Err(EngineError::Store {
                source: plasticity_db::StoreError::InvalidScore { .. }
            })
        ));
        assert!(store.all_agents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_per_type_seeds_nothing() {
        let store = InMemoryAgentStore::new();
        let config = PopulationConfig {
            seed_per_type: 0,
            ..PopulationConfig::default()
        };
        let report = seed_population(
            &store,
            &BroadcastPublisher::new(),
            &config,
            &mut SeededRandom::from_seed(4),
        )
        .await
        .unwrap();

        assert!(report.agents.is_empty());
        assert_eq!(report.collaborations, 0);
    }
}
