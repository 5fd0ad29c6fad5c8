//! The agent store port.
//!
//! The store is the only mutable shared state of the control loop. It
//! owns the invariants on agents and relationships; callers rely on it to
//! reject a write that would break them rather than checking first.

use std::future::Future;

use chrono::{DateTime, Utc};
use plasticity_types::{Agent, AgentId, Relationship, RelationshipId, RelationshipType};
use rust_decimal::Decimal;

use crate::error::StoreError;

/// CRUD over agents and relationships with logical-delete semantics.
///
/// Implementations must uphold:
///
/// - `destroyed_at`, once set, is never cleared, and a destroyed agent
///   accepts no further mutation.
/// - At most one relationship of a given type per unordered agent pair.
/// - Only collaboration strengths change after creation, and stay within
///   `0..=1`.
pub trait AgentStore: Send + Sync {
    /// Agents with no destruction timestamp, in creation order.
    fn active_agents(&self) -> impl Future<Output = Result<Vec<Agent>, StoreError>> + Send;

    /// Every agent ever stored, destroyed ones included, in creation order.
    fn all_agents(&self) -> impl Future<Output = Result<Vec<Agent>, StoreError>> + Send;

    /// Look up one agent, active or destroyed.
    fn get_agent(&self, id: AgentId) -> impl Future<Output = Result<Agent, StoreError>> + Send;

    /// Store a new agent.
    fn insert_agent(&self, agent: Agent) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Write a new performance score. Returns the updated record.
    fn update_performance(
        &self,
        id: AgentId,
        score: Decimal,
    ) -> impl Future<Output = Result<Agent, StoreError>> + Send;

    /// Write a new computational allocation.
    fn update_computational(
        &self,
        id: AgentId,
        computational: u32,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Logically delete an agent. Returns the destroyed record.
    fn mark_destroyed(
        &self,
        id: AgentId,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Agent, StoreError>> + Send;

    /// Every relationship of the given type, in creation order.
    fn relationships(
        &self,
        relationship_type: RelationshipType,
    ) -> impl Future<Output = Result<Vec<Relationship>, StoreError>> + Send;

    /// Store a new relationship between two active agents.
    fn insert_relationship(
        &self,
        relationship: Relationship,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Write a new collaboration strength.
    fn update_strength(
        &self,
        id: RelationshipId,
        strength: Decimal,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
