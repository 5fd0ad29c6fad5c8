//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error that wraps every failure mode
//! during startup, so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: plasticity_core::ConfigError,
    },

    /// A guarded collaborator call failed outside a tick.
    #[error("control error: {source}")]
    Control {
        /// The underlying control loop error.
        #[from]
        source: plasticity_core::ControlError,
    },

    /// The agent store rejected a write while seeding.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: plasticity_db::StoreError,
    },

    /// NATS connection failed.
    #[error("NATS error: {message}")]
    Nats {
        /// Description of the NATS failure.
        message: String,
    },

    /// The log subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the subscriber failure.
        message: String,
    },
}
