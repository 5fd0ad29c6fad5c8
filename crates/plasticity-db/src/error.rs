//! Error types for the data layer.
//!
//! [`StoreError`] covers both invariant violations the store rejects and
//! transient backend failures. [`MetricError`] covers the metric source.
//! The control loop treats either as a per-agent failure: logged, skipped.

use plasticity_types::{AgentId, RelationshipId, RelationshipType};
use rust_decimal::Decimal;

/// Errors that can occur in the agent store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No agent with this ID exists.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// The agent exists but has been destroyed and can no longer change.
    #[error("agent {0} is destroyed")]
    AgentDestroyed(AgentId),

    /// An agent with this ID is already stored.
    #[error("duplicate agent: {0}")]
    DuplicateAgent(AgentId),

    /// A score outside `0..=100` was written.
    #[error("invalid score for agent {agent_id}: {score}")]
    InvalidScore {
        /// The agent being updated.
        agent_id: AgentId,
        /// The rejected score.
        score: Decimal,
    },

    /// The pair already has a relationship of this type.
    #[error("duplicate {relationship_type} relationship between {a} and {b}")]
    DuplicateRelationship {
        /// One endpoint.
        a: AgentId,
        /// The other endpoint.
        b: AgentId,
        /// The relationship type that already exists for the pair.
        relationship_type: RelationshipType,
    },

    /// A relationship would connect an agent to itself.
    #[error("agent {0} cannot be related to itself")]
    SelfRelationship(AgentId),

    /// No relationship with this ID exists.
    #[error("relationship not found: {0}")]
    RelationshipNotFound(RelationshipId),

    /// Only collaboration strengths can be adapted.
    #[error("relationship {id} is {relationship_type} and cannot be modified")]
    ImmutableRelationship {
        /// The relationship being updated.
        id: RelationshipId,
        /// Its type.
        relationship_type: RelationshipType,
    },

    /// A strength outside `0..=1` was written.
    #[error("invalid strength {0} (must be within 0..=1)")]
    InvalidStrength(Decimal),

    /// The backend could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur in the metric source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricError {
    /// The backend could not serve the request.
    #[error("metric source unavailable: {0}")]
    Unavailable(String),
}
