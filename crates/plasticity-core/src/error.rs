//! Error types for collaborator calls made by the control loop.
//!
//! A [`ControlError`] never escapes a tick: the tick procedures catch it
//! per agent (or per relationship), log it, and move on.

use plasticity_db::{MetricError, StoreError};

/// Errors from a single guarded collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// The call did not complete within the collaborator timeout.
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        /// The collaborator operation that was abandoned.
        operation: &'static str,
        /// The configured timeout.
        timeout_ms: u64,
    },

    /// The agent store rejected or failed the call.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// The metric source failed the call.
    #[error("metric error: {source}")]
    Metric {
        /// The underlying metric error.
        #[from]
        source: MetricError,
    },
}
