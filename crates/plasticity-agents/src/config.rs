//! Tunables for the agent logic.
//!
//! Each struct mirrors one section of `plasticity-config.yaml` and
//! deserializes with every field defaulted, so an empty section (or a
//! missing one) reproduces the stock behavior. The control loop owns one
//! of each and passes them by reference into the pure functions of this
//! crate.

use std::collections::BTreeMap;

use plasticity_types::{AgentType, MetricName};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AgentError, check_probability, check_range};

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Performance evaluator tunables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EvaluationConfig {
    /// Trailing metric window, in hours (default: 24).
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,

    /// Weight applied to each recognised metric's average. Metrics with no
    /// entry contribute nothing.
    #[serde(default = "default_metric_weights")]
    pub weights: BTreeMap<MetricName, Decimal>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            lookback_hours: default_lookback_hours(),
            weights: default_metric_weights(),
        }
    }
}

impl EvaluationConfig {
    /// The weight for `metric`, zero when unconfigured.
    pub fn weight(&self, metric: MetricName) -> Decimal {
        self.weights.get(&metric).copied().unwrap_or(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle manager tunables: destroy and spawn gates plus the starting
/// values of descendants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LifecycleConfig {
    /// Scores strictly below this destroy the agent (default: 50).
    #[serde(default = "default_destroy_score")]
    pub destroy_score: Decimal,

    /// Cash flow strictly below this makes the agent eligible for the
    /// risk draw (default: -1000).
    #[serde(default = "default_cash_flow_risk_threshold")]
    pub cash_flow_risk_threshold: Decimal,

    /// Probability that an eligible agent is destroyed for cash-flow risk
    /// (default: 0.05).
    #[serde(default = "default_cash_flow_risk_probability")]
    pub cash_flow_risk_probability: f64,

    /// Scores strictly above this make the agent eligible to spawn
    /// (default: 80).
    #[serde(default = "default_spawn_score")]
    pub spawn_score: Decimal,

    /// Cash flow strictly above this makes the agent eligible to spawn
    /// (default: 5000).
    #[serde(default = "default_spawn_cash_flow")]
    pub spawn_cash_flow: Decimal,

    /// Probability that an eligible agent spawns a descendant
    /// (default: 0.10).
    #[serde(default = "default_spawn_probability")]
    pub spawn_probability: f64,

    /// Starting score of a descendant (default: 50).
    #[serde(default = "default_descendant_score")]
    pub descendant_score: Decimal,

    /// Starting cash flow of a descendant (default: 1000).
    #[serde(default = "default_descendant_cash_flow")]
    pub descendant_cash_flow: Decimal,

    /// Strength of the parent-child edge created at spawn (default: 0.9).
    #[serde(default = "default_parent_child_strength")]
    pub parent_child_strength: Decimal,

    /// Upper bound on the active population. Zero means unlimited.
    #[serde(default)]
    pub max_population: u32,

    /// Types a descendant may take, keyed by the parent's type. A missing
    /// or empty entry means any type.
    #[serde(default = "default_complements")]
    pub complements: BTreeMap<AgentType, Vec<AgentType>>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            destroy_score: default_destroy_score(),
            cash_flow_risk_threshold: default_cash_flow_risk_threshold(),
            cash_flow_risk_probability: default_cash_flow_risk_probability(),
            spawn_score: default_spawn_score(),
            spawn_cash_flow: default_spawn_cash_flow(),
            spawn_probability: default_spawn_probability(),
            descendant_score: default_descendant_score(),
            descendant_cash_flow: default_descendant_cash_flow(),
            parent_child_strength: default_parent_child_strength(),
            max_population: 0,
            complements: default_complements(),
        }
    }
}

impl LifecycleConfig {
    /// Whether an active population of `active` leaves room for one more.
    pub const fn has_capacity(&self, active: usize) -> bool {
        self.max_population == 0 || active < self.max_population as usize
    }

    /// Check probabilities, the descendant score, and the edge strength.
    ///
    /// # Errors
    ///
    /// Returns the first [`AgentError`] found.
    pub fn validate(&self) -> Result<(), AgentError> {
        check_probability("lifecycle.cash_flow_risk_probability", self.cash_flow_risk_probability)?;
        check_probability("lifecycle.spawn_probability", self.spawn_probability)?;
        check_range(
            "lifecycle.descendant_score",
            self.descendant_score,
            Decimal::ZERO,
            Decimal::ONE_HUNDRED,
        )?;
        check_range(
            "lifecycle.parent_child_strength",
            self.parent_child_strength,
            Decimal::ZERO,
            Decimal::ONE,
        )
    }
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Relationship optimizer tunables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkConfig {
    /// Fraction of the endpoints' mean score (as 0 to 1) added to a
    /// collaboration strength each optimization tick (default: 0.1).
    #[serde(default = "default_reinforcement_rate")]
    pub reinforcement_rate: Decimal,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            reinforcement_rate: default_reinforcement_rate(),
        }
    }
}

impl NetworkConfig {
    /// Reject a negative rate, which would let strengths decrease.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::OutOfRange`] for a rate outside 0 to 1.
    pub fn validate(&self) -> Result<(), AgentError> {
        check_range(
            "network.reinforcement_rate",
            self.reinforcement_rate,
            Decimal::ZERO,
            Decimal::ONE,
        )
    }
}

// ---------------------------------------------------------------------------
// Rebalance
// ---------------------------------------------------------------------------

/// Resource rebalancer tunables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RebalanceConfig {
    /// Scores strictly above this get the high allocation (default: 80).
    #[serde(default = "default_high_score")]
    pub high_score: Decimal,

    /// Scores strictly below this get the low allocation (default: 30).
    #[serde(default = "default_low_score")]
    pub low_score: Decimal,

    /// Computational budget for high performers (default: 100).
    #[serde(default = "default_high_allocation")]
    pub high_allocation: u32,

    /// Computational budget for low performers (default: 20).
    #[serde(default = "default_low_allocation")]
    pub low_allocation: u32,
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self {
            high_score: default_high_score(),
            low_score: default_low_score(),
            high_allocation: default_high_allocation(),
            low_allocation: default_low_allocation(),
        }
    }
}

impl RebalanceConfig {
    /// Reject tiers that overlap.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvertedBounds`] when `low_score` exceeds
    /// `high_score`.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.low_score > self.high_score {
            return Err(AgentError::InvertedBounds {
                name: "rebalance.low_score/high_score",
                low: self.low_score,
                high: self.high_score,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Gap scan
// ---------------------------------------------------------------------------

/// Gap scanner tunables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GapScanConfig {
    /// Types whose share (percent) is strictly below this are gaps
    /// (default: 15).
    #[serde(default = "default_share_threshold")]
    pub share_threshold_pct: Decimal,

    /// Independent probability of filling each gap per scan (default: 0.3).
    #[serde(default = "default_fill_probability")]
    pub fill_probability: f64,

    /// Starting score of a gap-fill agent (default: 60).
    #[serde(default = "default_gap_fill_score")]
    pub fill_score: Decimal,

    /// Starting cash flow of a gap-fill agent (default: 2000).
    #[serde(default = "default_gap_fill_cash_flow")]
    pub fill_cash_flow: Decimal,
}

impl Default for GapScanConfig {
    fn default() -> Self {
        Self {
            share_threshold_pct: default_share_threshold(),
            fill_probability: default_fill_probability(),
            fill_score: default_gap_fill_score(),
            fill_cash_flow: default_gap_fill_cash_flow(),
        }
    }
}

impl GapScanConfig {
    /// Check the probability and the percentage threshold.
    ///
    /// # Errors
    ///
    /// Returns the first [`AgentError`] found.
    pub fn validate(&self) -> Result<(), AgentError> {
        check_probability("gap_scan.fill_probability", self.fill_probability)?;
        check_range(
            "gap_scan.share_threshold_pct",
            self.share_threshold_pct,
            Decimal::ZERO,
            Decimal::ONE_HUNDRED,
        )?;
        check_range(
            "gap_scan.fill_score",
            self.fill_score,
            Decimal::ZERO,
            Decimal::ONE_HUNDRED,
        )
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_lookback_hours() -> u32 {
    24
}

fn default_metric_weights() -> BTreeMap<MetricName, Decimal> {
    BTreeMap::from([
        (MetricName::RevenueGrowth, Decimal::new(30, 2)),
        (MetricName::CostEfficiency, Decimal::new(20, 2)),
        (MetricName::CustomerSatisfaction, Decimal::new(15, 2)),
        (MetricName::MarketShare, Decimal::new(25, 2)),
        (MetricName::InnovationIndex, Decimal::new(10, 2)),
    ])
}

const fn default_destroy_score() -> Decimal {
    Decimal::from_parts(50, 0, 0, false, 0)
}

const fn default_cash_flow_risk_threshold() -> Decimal {
    Decimal::from_parts(1000, 0, 0, true, 0)
}

const fn default_cash_flow_risk_probability() -> f64 {
    0.05
}

const fn default_spawn_score() -> Decimal {
    Decimal::from_parts(80, 0, 0, false, 0)
}

const fn default_spawn_cash_flow() -> Decimal {
    Decimal::from_parts(5000, 0, 0, false, 0)
}

const fn default_spawn_probability() -> f64 {
    0.10
}

const fn default_descendant_score() -> Decimal {
    Decimal::from_parts(50, 0, 0, false, 0)
}

const fn default_descendant_cash_flow() -> Decimal {
    Decimal::from_parts(1000, 0, 0, false, 0)
}

const fn default_parent_child_strength() -> Decimal {
    Decimal::from_parts(9, 0, 0, false, 1)
}

fn default_complements() -> BTreeMap<AgentType, Vec<AgentType>> {
    BTreeMap::from([
        (
            AgentType::MarketAgent,
            vec![AgentType::StrategyAgent, AgentType::NegotiationAgent],
        ),
        (
            AgentType::StrategyAgent,
            vec![AgentType::MarketAgent, AgentType::ResourceAgent],
        ),
        (
            AgentType::ResourceAgent,
            vec![AgentType::PerformanceAgent, AgentType::StrategyAgent],
        ),
        (
            AgentType::NegotiationAgent,
            vec![AgentType::MarketAgent, AgentType::ResourceAgent],
        ),
        (
            AgentType::PerformanceAgent,
            vec![AgentType::ResourceAgent, AgentType::StrategyAgent],
        ),
    ])
}

const fn default_reinforcement_rate() -> Decimal {
    Decimal::from_parts(1, 0, 0, false, 1)
}

const fn default_high_score() -> Decimal {
    Decimal::from_parts(80, 0, 0, false, 0)
}

const fn default_low_score() -> Decimal {
    Decimal::from_parts(30, 0, 0, false, 0)
}

const fn default_high_allocation() -> u32 {
    100
}

const fn default_low_allocation() -> u32 {
    20
}

const fn default_share_threshold() -> Decimal {
    Decimal::from_parts(15, 0, 0, false, 0)
}

const fn default_fill_probability() -> f64 {
    0.3
}

const fn default_gap_fill_score() -> Decimal {
    Decimal::from_parts(60, 0, 0, false, 0)
}

const fn default_gap_fill_cash_flow() -> Decimal {
    Decimal::from_parts(2000, 0, 0, false, 0)
}
