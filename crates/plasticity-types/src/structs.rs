//! Core records for the Plasticity control loop.
//!
//! Agents and relationships live in the agent store, metrics come from the
//! external metric source, and events are transient notifications handed
//! to the publisher.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{AgentType, CreationReason, DestroyReason, EventType, RelationshipType};
use crate::ids::{AgentId, EventId, RelationshipId};

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// Resource allocation for an agent. The rebalancer only touches
/// `computational`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResources {
    /// Computational budget units.
    pub computational: u32,
    /// Working memory in megabytes.
    pub memory_mb: u32,
    /// External API calls allowed per hour.
    pub api_quota_per_hour: u32,
}

/// Operating strategy derived from the agent type at creation.
///
/// Never mutated after the agent is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStrategy {
    /// What the agent concentrates on.
    pub focus: String,
    /// Appetite for risk, 0.0 to 1.0.
    pub risk_tolerance: Decimal,
    /// How far ahead the agent plans, in days.
    pub planning_horizon_days: u32,
    /// Ordered objectives.
    pub objectives: Vec<String>,
}

/// An autonomous unit in the population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Immutable identifier assigned at creation.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Capability category.
    pub agent_type: AgentType,
    /// Performance score, kept within 0 to 100.
    pub performance_score: Decimal,
    /// Cash flow. May be negative.
    pub cash_flow: Decimal,
    /// Current resource allocation.
    pub resources: AgentResources,
    /// Strategy fixed at creation.
    pub strategy: AgentStrategy,
    /// The agent this one descends from, if any.
    pub parent_id: Option<AgentId>,
    /// Why this agent was created.
    pub creation_reason: CreationReason,
    /// When the agent was created.
    pub created_at: DateTime<Utc>,
    /// When the agent was destroyed. Once set, never cleared.
    pub destroyed_at: Option<DateTime<Utc>>,
}

impl Agent {
    /// Whether the agent belongs to the active population.
    pub const fn is_active(&self) -> bool {
        self.destroyed_at.is_none()
    }
}

// ---------------------------------------------------------------------------
// Relationship
// ---------------------------------------------------------------------------

/// An undirected, typed edge between two agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Edge identifier.
    pub id: RelationshipId,
    /// One endpoint.
    pub source_id: AgentId,
    /// The other endpoint.
    pub target_id: AgentId,
    /// Edge kind.
    pub relationship_type: RelationshipType,
    /// Strength, 0.0 to 1.0.
    pub strength: Decimal,
    /// When the edge was created.
    pub created_at: DateTime<Utc>,
    /// When the strength was last written.
    pub updated_at: DateTime<Utc>,
}

impl Relationship {
    /// Create a new edge stamped with `now`.
    pub fn new(
        source_id: AgentId,
        target_id: AgentId,
        relationship_type: RelationshipType,
        strength: Decimal,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RelationshipId::new(),
            source_id,
            target_id,
            relationship_type,
            strength,
            created_at: now,
            updated_at: now,
        }
    }

    /// The endpoints ordered so that `(a, b)` and `(b, a)` give the same key.
    pub fn pair_key(&self) -> (AgentId, AgentId) {
        if self.source_id <= self.target_id {
            (self.source_id, self.target_id)
        } else {
            (self.target_id, self.source_id)
        }
    }

    /// Whether this edge connects `a` and `b`, in either direction.
    pub fn connects(&self, a: AgentId, b: AgentId) -> bool {
        (self.source_id == a && self.target_id == b) || (self.source_id == b && self.target_id == a)
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// One append-only metric row from the metric source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    /// The agent the metric describes.
    pub agent_id: AgentId,
    /// Metric name as reported upstream.
    pub metric_name: String,
    /// Observed value.
    pub value: Decimal,
    /// Start of the measurement window.
    pub period_start: DateTime<Utc>,
    /// End of the measurement window.
    pub period_end: DateTime<Utc>,
}

/// The average of one metric over a trailing window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricAverage {
    /// Metric name as reported upstream.
    pub metric_name: String,
    /// Average value over the window.
    pub value: Decimal,
}

impl MetricAverage {
    /// Convenience constructor.
    pub fn new(metric_name: impl Into<String>, value: Decimal) -> Self {
        Self {
            metric_name: metric_name.into(),
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Payload of a `performance_updated` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceUpdatedDetails {
    /// Score before the evaluation.
    pub previous_score: Decimal,
    /// Score after the evaluation.
    pub new_score: Decimal,
    /// Number of metric averages the evaluator received.
    pub metrics_considered: u32,
}

/// Payload of an `agent_created` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCreatedDetails {
    /// Display name of the new agent.
    pub name: String,
    /// Type of the new agent.
    pub agent_type: AgentType,
    /// Why it was created.
    pub reason: CreationReason,
    /// Parent agent for descendants.
    pub parent_id: Option<AgentId>,
    /// Starting score.
    pub performance_score: Decimal,
    /// Starting cash flow.
    pub cash_flow: Decimal,
}

/// Payload of an `agent_destroyed` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDestroyedDetails {
    /// Why the agent was destroyed.
    pub reason: DestroyReason,
    /// Score at the time of destruction.
    pub final_score: Decimal,
    /// Cash flow at the time of destruction.
    pub cash_flow: Decimal,
}

/// Typed event payload. Serialized with an `event_type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventDetails {
    /// See [`PerformanceUpdatedDetails`].
    PerformanceUpdated(PerformanceUpdatedDetails),
    /// See [`AgentCreatedDetails`].
    AgentCreated(AgentCreatedDetails),
    /// See [`AgentDestroyedDetails`].
    AgentDestroyed(AgentDestroyedDetails),
}

/// A transient notification describing a state transition.
///
/// Events are not persisted by the control loop; they go to the publisher
/// after the mutation they describe has been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier.
    pub id: EventId,
    /// The agent the event is about.
    pub agent_id: AgentId,
    /// Typed payload.
    pub details: EventDetails,
    /// When the event was created.
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Create an event stamped with the current time.
    pub fn new(agent_id: AgentId, details: EventDetails) -> Self {
        Self {
            id: EventId::new(),
            agent_id,
            details,
            created_at: Utc::now(),
        }
    }

    /// The event's type tag, derived from the payload.
    pub const fn event_type(&self) -> EventType {
        match self.details {
            EventDetails::PerformanceUpdated(_) => EventType::PerformanceUpdated,
            EventDetails::AgentCreated(_) => EventType::AgentCreated,
            EventDetails::AgentDestroyed(_) => EventType::AgentDestroyed,
        }
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Population census taken from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationStats {
    /// Agents with no destruction timestamp.
    pub active: u32,
    /// Agents kept for history after destruction.
    pub destroyed: u32,
    /// Active agents per type. Every type is present, possibly with zero.
    pub by_type: BTreeMap<AgentType, u32>,
    /// Mean score of the active population, zero when empty.
    pub mean_score: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn pair_key_is_order_independent() {
        let a = AgentId::new();
        let b = AgentId::new();
        let now = Utc::now();
        let ab = Relationship::new(a, b, RelationshipType::Collaboration, dec!(0.5), now);
        let ba = Relationship::new(b, a, RelationshipType::Collaboration, dec!(0.5), now);
        assert_eq!(ab.pair_key(), ba.pair_key());
        assert!(ab.connects(b, a));
        assert!(!ab.connects(a, AgentId::new()));
    }

    #[test]
    fn event_type_follows_payload() {
        let event = Event::new(
            AgentId::new(),
            EventDetails::AgentDestroyed(AgentDestroyedDetails {
                reason: DestroyReason::PoorPerformance,
                final_score: dec!(45),
                cash_flow: dec!(0),
            }),
        );
        assert_eq!(event.event_type(), EventType::AgentDestroyed);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["details"]["event_type"], "agent_destroyed");
        assert_eq!(json["details"]["reason"], "poor_performance");
    }
}
