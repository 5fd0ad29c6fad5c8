//! Configuration loading and typed config structures for the control loop.
//!
//! The canonical configuration lives in `plasticity-config.yaml` at the
//! project root. Every section is optional and every field has a default,
//! so an empty file yields the stock tunables. The agent-logic sections
//! (`evaluation`, `lifecycle`, `network`, `rebalance`, `gap_scan`) are the
//! structs from `plasticity-agents`; this module adds scheduling,
//! population, infrastructure, and logging.

use std::path::Path;
use std::time::Duration;

use plasticity_agents::{
    AgentError, EvaluationConfig, GapScanConfig, LifecycleConfig, NetworkConfig, RebalanceConfig,
};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A tunable failed validation.
    #[error("invalid tunable: {source}")]
    Tunable {
        /// The underlying validation error.
        #[from]
        source: AgentError,
    },

    /// A schedule or timeout was configured as zero.
    #[error("{name} must be greater than zero")]
    ZeroDuration {
        /// Which setting was zero.
        name: &'static str,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level control loop configuration.
///
/// Mirrors the structure of `plasticity-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlasticityConfig {
    /// Tick periods.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Performance evaluator weights and lookback.
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Destroy and spawn gates.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Relationship reinforcement.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Resource tiers.
    #[serde(default)]
    pub rebalance: RebalanceConfig,

    /// Gap scanner threshold and fill probability.
    #[serde(default)]
    pub gap_scan: GapScanConfig,

    /// Seed population and random seed.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Collaborator connections and timeouts.
    #[serde(default)]
    pub infrastructure: InfrastructureConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PlasticityConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `NATS_URL` overrides `infrastructure.nats_url` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or a
    /// validation error if a tunable is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or a
    /// validation error if a tunable is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.infrastructure.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject zero periods, zero timeouts, and out-of-range tunables.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schedule.validate()?;
        if self.infrastructure.collaborator_timeout_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                name: "infrastructure.collaborator_timeout_ms",
            });
        }
        self.lifecycle.validate()?;
        self.network.validate()?;
        self.rebalance.validate()?;
        self.gap_scan.validate()?;
        plasticity_agents::error::check_range(
            "population.seed_score",
            self.population.seed_score,
            Decimal::ZERO,
            Decimal::ONE_HUNDRED,
        )?;
        plasticity_agents::error::check_range(
            "population.collaboration_strength",
            self.population.collaboration_strength,
            Decimal::ZERO,
            Decimal::ONE,
        )?;
        Ok(())
    }
}

/// Tick periods for the three scheduled procedures.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between evaluation ticks (default: 300).
    #[serde(default = "default_evaluation_interval_secs")]
    pub evaluation_interval_secs: u64,

    /// Seconds between network optimization ticks (default: 21600).
    #[serde(default = "default_optimization_interval_secs")]
    pub optimization_interval_secs: u64,

    /// Seconds between gap scans (default: 900).
    #[serde(default = "default_gap_scan_interval_secs")]
    pub gap_scan_interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            evaluation_interval_secs: default_evaluation_interval_secs(),
            optimization_interval_secs: default_optimization_interval_secs(),
            gap_scan_interval_secs: default_gap_scan_interval_secs(),
        }
    }
}

impl ScheduleConfig {
    /// Evaluation period.
    pub const fn evaluation_interval(&self) -> Duration {
        Duration::from_secs(self.evaluation_interval_secs)
    }

    /// Network optimization period.
    pub const fn optimization_interval(&self) -> Duration {
        Duration::from_secs(self.optimization_interval_secs)
    }

    /// Gap scan period.
    pub const fn gap_scan_interval(&self) -> Duration {
        Duration::from_secs(self.gap_scan_interval_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("schedule.evaluation_interval_secs", self.evaluation_interval_secs),
            ("schedule.optimization_interval_secs", self.optimization_interval_secs),
            ("schedule.gap_scan_interval_secs", self.gap_scan_interval_secs),
        ];
        match periods.into_iter().find(|(_, secs)| *secs == 0) {
            Some((name, _)) => Err(ConfigError::ZeroDuration { name }),
            None => Ok(()),
        }
    }
}

/// Seed population configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Seed agents created per type at startup when the store is empty
    /// (default: 1).
    #[serde(default = "default_seed_per_type")]
    pub seed_per_type: u32,

    /// Starting score of seed agents (default: 60).
    #[serde(default = "default_seed_score")]
    pub seed_score: Decimal,

    /// Starting cash flow of seed agents (default: 2000).
    #[serde(default = "default_seed_cash_flow")]
    pub seed_cash_flow: Decimal,

    /// Strength of the collaboration edges among seed agents
    /// (default: 0.5).
    #[serde(default = "default_collaboration_strength")]
    pub collaboration_strength: Decimal,

    /// Random seed for reproducible runs. Entropy when absent.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            seed_per_type: default_seed_per_type(),
            seed_score: default_seed_score(),
            seed_cash_flow: default_seed_cash_flow(),
            collaboration_strength: default_collaboration_strength(),
            rng_seed: None,
        }
    }
}

/// Collaborator connections and call limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfrastructureConfig {
    /// NATS URL for event forwarding. Events are only logged when absent.
    #[serde(default)]
    pub nats_url: Option<String>,

    /// Upper bound on any single store or metric call, in milliseconds
    /// (default: 5000).
    #[serde(default = "default_collaborator_timeout_ms")]
    pub collaborator_timeout_ms: u64,
}

impl InfrastructureConfig {
    /// Override the NATS URL with the `NATS_URL` environment variable when
    /// set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("NATS_URL") {
            self.nats_url = Some(val);
        }
    }

    /// Collaborator call timeout.
    pub const fn collaborator_timeout(&self) -> Duration {
        Duration::from_millis(self.collaborator_timeout_ms)
    }
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            nats_url: None,
            collaborator_timeout_ms: default_collaborator_timeout_ms(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (trace, debug, info, warn,
    /// error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_evaluation_interval_secs() -> u64 {
    300
}

const fn default_optimization_interval_secs() -> u64 {
    21_600
}

const fn default_gap_scan_interval_secs() -> u64 {
    900
}

const fn default_seed_per_type() -> u32 {
    1
}

const fn default_seed_score() -> Decimal {
    Decimal::from_parts(60, 0, 0, false, 0)
}

const fn default_seed_cash_flow() -> Decimal {
    Decimal::from_parts(2000, 0, 0, false, 0)
}

const fn default_collaboration_strength() -> Decimal {
    Decimal::from_parts(5, 0, 0, false, 1)
}

const fn default_collaborator_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    String::from("info")
}
