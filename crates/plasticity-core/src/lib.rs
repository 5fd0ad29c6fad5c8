//! Control loop, scheduler, and configuration for the Plasticity
//! population manager.
//!
//! A population of agent records is periodically rescored from business
//! metrics, pruned when it underperforms, extended with descendants of
//! high performers, topped up where a capability type is scarce, and its
//! collaboration graph re-weighted by performance.
//!
//! ```text
//! Scheduler (one task, three intervals)
//!     |
//!     +-- evaluation tick ----> MetricSource -> score -> AgentStore
//!     |                           -> destroy / spawn -> EventPublisher
//!     +-- network tick -------> reinforce collaborations, rebalance resources
//!     |
//!     +-- gap scan -----------> fill under-represented types -> EventPublisher
//! ```
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration ([`PlasticityConfig`])
//! - [`control`] -- Pause / resume / stop flags ([`SchedulerControl`])
//! - [`control_loop`] -- The [`ControlLoop`] and its collaborators
//! - [`error`] -- Guarded collaborator call errors ([`ControlError`])
//! - [`events`] -- Event publishing port and in-process publishers
//! - [`scheduler`] -- Interval-driven [`Scheduler`]
//! - [`summary`] -- Per-tick summaries and the [`SchedulerReport`]
//!
//! The three tick procedures are implemented on [`ControlLoop`] in the
//! private `evaluation`, `lifecycle`, `network`, and `gap_scan` modules.

pub mod config;
pub mod control;
pub mod control_loop;
pub mod error;
pub mod events;
mod evaluation;
mod gap_scan;
mod lifecycle;
mod network;
pub mod scheduler;
pub mod summary;

// Re-export primary types at crate root for convenience.
pub use config::{ConfigError, LogFormat, PlasticityConfig};
pub use control::SchedulerControl;
pub use control_loop::ControlLoop;
pub use error::ControlError;
pub use events::{BroadcastPublisher, EventPublisher, LogPublisher};
pub use scheduler::Scheduler;
pub use summary::{EvaluationSummary, GapScanSummary, NetworkSummary, SchedulerReport};
