//! Shared type definitions for the Plasticity control loop.
//!
//! This crate is the single source of truth for the records that flow
//! between the agent logic, the store, the control loop, and the event
//! subscribers. It holds data only; behavior lives downstream.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agents, relationships, events
//! - [`enums`] -- Agent types, relationship types, metric names, lifecycle tags
//! - [`structs`] -- Agents, relationships, metrics, events, population stats

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{AgentType, CreationReason, DestroyReason, EventType, MetricName, RelationshipType};
pub use ids::{AgentId, EventId, RelationshipId};
pub use structs::{
    Agent, AgentCreatedDetails, AgentDestroyedDetails, AgentResources, AgentStrategy, Event,
    EventDetails, Metric, MetricAverage, PerformanceUpdatedDetails, PopulationStats,
    Relationship,
};
