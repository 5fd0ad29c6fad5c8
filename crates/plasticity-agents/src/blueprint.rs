//! Construction of new agent records.
//!
//! Seed agents, descendants, and gap-fill agents all go through
//! [`build_agent`]. The strategy is a fixed function of the type, the name
//! is a type-keyed prefix plus a Greek-letter suffix, and the resources are
//! drawn from fixed ranges using the injected random source.

use chrono::{DateTime, Utc};
use plasticity_types::{Agent, AgentId, AgentResources, AgentStrategy, AgentType, CreationReason};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::LifecycleConfig;
use crate::random::RandomSource;

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// Suffixes appended to the type prefix when naming a new agent.
pub const GREEK_SUFFIXES: &[&str] = &[
    "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta", "Iota", "Kappa",
    "Lambda", "Mu", "Nu", "Xi", "Omicron", "Pi", "Rho", "Sigma", "Tau", "Upsilon", "Phi",
    "Chi", "Psi", "Omega",
];

/// The name prefix for a type.
pub const fn name_prefix(agent_type: AgentType) -> &'static str {
    match agent_type {
        AgentType::MarketAgent => "Scout",
        AgentType::StrategyAgent => "Architect",
        AgentType::ResourceAgent => "Steward",
        AgentType::NegotiationAgent => "Broker",
        AgentType::PerformanceAgent => "Auditor",
    }
}

/// Generate a display name such as `Broker-Sigma`.
pub fn generate_name(agent_type: AgentType, rng: &mut impl RandomSource) -> String {
    let idx = rng.next_index(GREEK_SUFFIXES.len());
    let suffix = GREEK_SUFFIXES.get(idx).copied().unwrap_or("Alpha");
    format!("{}-{suffix}", name_prefix(agent_type))
}

// ---------------------------------------------------------------------------
// Strategy and resources
// ---------------------------------------------------------------------------

/// The fixed strategy for a type.
pub fn strategy_for(agent_type: AgentType) -> AgentStrategy {
    let (focus, risk_pct, horizon, objectives): (&str, i64, u32, &[&str]) = match agent_type {
        AgentType::MarketAgent => (
            "market_analysis",
            40,
            30,
            &["track_demand", "identify_opportunities"],
        ),
        AgentType::StrategyAgent => (
            "strategic_planning",
            50,
            90,
            &["set_direction", "allocate_priorities"],
        ),
        AgentType::ResourceAgent => (
            "resource_allocation",
            30,
            60,
            &["optimize_budgets", "control_costs"],
        ),
        AgentType::NegotiationAgent => (
            "deal_making",
            60,
            14,
            &["close_partnerships", "improve_terms"],
        ),
        AgentType::PerformanceAgent => (
            "performance_monitoring",
            20,
            30,
            &["track_kpis", "flag_underperformers"],
        ),
    };
    AgentStrategy {
        focus: focus.to_owned(),
        risk_tolerance: Decimal::new(risk_pct, 2),
        planning_horizon_days: horizon,
        objectives: objectives.iter().map(|s| (*s).to_owned()).collect(),
    }
}

/// Inclusive range of the computational budget given at creation.
pub const COMPUTATIONAL_RANGE: (u32, u32) = (40, 60);

/// Inclusive range of the memory allocation (MB) given at creation.
pub const MEMORY_MB_RANGE: (u32, u32) = (256, 1024);

/// Inclusive range of the hourly API quota given at creation.
pub const API_QUOTA_RANGE: (u32, u32) = (100, 500);

/// Draw a starting resource allocation.
pub fn random_resources(rng: &mut impl RandomSource) -> AgentResources {
    AgentResources {
        computational: rng.next_in_range(COMPUTATIONAL_RANGE.0, COMPUTATIONAL_RANGE.1),
        memory_mb: rng.next_in_range(MEMORY_MB_RANGE.0, MEMORY_MB_RANGE.1),
        api_quota_per_hour: rng.next_in_range(API_QUOTA_RANGE.0, API_QUOTA_RANGE.1),
    }
}

// ---------------------------------------------------------------------------
// Descendant type
// ---------------------------------------------------------------------------

/// Pick a descendant's type uniformly from the parent type's complement
/// list, or uniformly over all types when the list is missing or empty.
pub fn pick_descendant_type(
    parent: AgentType,
    config: &LifecycleConfig,
    rng: &mut impl RandomSource,
) -> AgentType {
    let choices: &[AgentType] = match config.complements.get(&parent) {
        Some(list) if !list.is_empty() => list,
        _ => {
            debug!(parent = %parent, "No complement entry, choosing from all types");
            &AgentType::ALL
        }
    };
    let idx = rng.next_index(choices.len());
    choices.get(idx).copied().unwrap_or(parent)
}

// ---------------------------------------------------------------------------
// Blueprint
// ---------------------------------------------------------------------------

/// Everything needed to create an agent apart from the random draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentBlueprint {
    /// Type of the new agent.
    pub agent_type: AgentType,
    /// Why the agent is being created.
    pub creation_reason: CreationReason,
    /// Parent for descendants.
    pub parent_id: Option<AgentId>,
    /// Starting score.
    pub performance_score: Decimal,
    /// Starting cash flow.
    pub cash_flow: Decimal,
}

impl AgentBlueprint {
    /// A descendant of `parent_id` with the configured starting values.
    pub const fn descendant(
        agent_type: AgentType,
        parent_id: AgentId,
        config: &LifecycleConfig,
    ) -> Self {
        Self {
            agent_type,
            creation_reason: CreationReason::Descendant,
            parent_id: Some(parent_id),
            performance_score: config.descendant_score,
            cash_flow: config.descendant_cash_flow,
        }
    }

    /// A parentless agent with explicit starting values.
    pub const fn new(
        agent_type: AgentType,
        creation_reason: CreationReason,
        performance_score: Decimal,
        cash_flow: Decimal,
    ) -> Self {
        Self {
            agent_type,
            creation_reason,
            parent_id: None,
            performance_score,
            cash_flow,
        }
    }
}

/// Materialize a blueprint into an active agent stamped with `now`.
pub fn build_agent(
    blueprint: &AgentBlueprint,
    rng: &mut impl RandomSource,
    now: DateTime<Utc>,
) -> Agent {
    let name = generate_name(blueprint.agent_type, rng);
    let resources = random_resources(rng);
    Agent {
        id: AgentId::new(),
        name,
        agent_type: blueprint.agent_type,
        performance_score: blueprint.performance_score,
        cash_flow: blueprint.cash_flow,
        resources,
        strategy: strategy_for(blueprint.agent_type),
        parent_id: blueprint.parent_id,
        creation_reason: blueprint.creation_reason,
        created_at: now,
        destroyed_at: None,
    }
}
