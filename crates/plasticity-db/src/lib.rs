//! Data layer for the Plasticity control loop.
//!
//! Defines the two collaborator ports the loop reads and writes through,
//! plus in-memory implementations that enforce the same invariants a
//! persistent backend must.
//!
//! ```text
//! ControlLoop
//!     |
//!     +-- read metric averages --> MetricSource   (append-only rows)
//!     |
//!     +-- read / mutate ---------> AgentStore     (agents + relationships)
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The [`AgentStore`] port
//! - [`memory`] -- [`InMemoryAgentStore`], guarded by a `tokio` `RwLock`
//! - [`metrics`] -- The [`MetricSource`] port and [`InMemoryMetricSource`]
//! - [`error`] -- Store and metric error types

pub mod error;
pub mod memory;
pub mod metrics;
pub mod store;

// Re-export primary types for convenience.
pub use error::{MetricError, StoreError};
pub use memory::InMemoryAgentStore;
pub use metrics::{InMemoryMetricSource, MetricSource};
pub use store::AgentStore;
