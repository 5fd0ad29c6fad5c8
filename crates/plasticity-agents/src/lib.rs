//! Agent logic for the Plasticity control loop.
//!
//! Everything here operates on agent records without touching I/O. It sits
//! between `plasticity-types` (the data) and `plasticity-core` (which
//! drives these functions against the store on a schedule).
//!
//! # Modules
//!
//! - [`blueprint`] -- Naming, strategy, resources, and descendant types for new agents
//! - [`config`] -- Tunables for every component ([`LifecycleConfig`] and friends)
//! - [`error`] -- Tunable validation errors ([`AgentError`])
//! - [`evaluation`] -- Weighted performance scoring ([`evaluate_score`])
//! - [`gaps`] -- Type distribution, gap detection, population census
//! - [`lifecycle`] -- Destroy / spawn / retain decision ([`LifecycleDecision`])
//! - [`network`] -- Collaboration strength reinforcement
//! - [`random`] -- Injectable random source ([`RandomSource`])
//! - [`rebalance`] -- Performance-tier computational allocation

pub mod blueprint;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod gaps;
pub mod lifecycle;
pub mod network;
pub mod random;
pub mod rebalance;

// Re-export primary types at crate root for convenience.
pub use blueprint::{AgentBlueprint, build_agent, pick_descendant_type};
pub use config::{EvaluationConfig, GapScanConfig, LifecycleConfig, NetworkConfig, RebalanceConfig};
pub use error::AgentError;
pub use evaluation::evaluate_score;
pub use gaps::{population_stats, type_distribution, under_represented};
pub use lifecycle::{LifecycleDecision, decide};
pub use network::reinforced_strength;
pub use random::{FixedRandom, RandomSource, SeededRandom};
pub use rebalance::target_allocation;
