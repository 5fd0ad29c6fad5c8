//! Enumeration types for the Plasticity control loop.
//!
//! String forms (`as_str`, serde) match the tags external collaborators
//! use: `market_agent`, `parent-child`, `agent_destroyed`, and so on.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Agent types
// ---------------------------------------------------------------------------

/// The capability category of an agent. Used for gap analysis and for
/// choosing a descendant's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// Watches market conditions and demand signals.
    MarketAgent,
    /// Plans campaigns and long-range positioning.
    StrategyAgent,
    /// Allocates budgets and infrastructure.
    ResourceAgent,
    /// Handles deals and partner negotiation.
    NegotiationAgent,
    /// Tracks key indicators and audits other agents.
    PerformanceAgent,
}

impl AgentType {
    /// Every agent type, in a fixed order.
    pub const ALL: [Self; 5] = [
        Self::MarketAgent,
        Self::StrategyAgent,
        Self::ResourceAgent,
        Self::NegotiationAgent,
        Self::PerformanceAgent,
    ];

    /// The snake-case tag for this type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarketAgent => "market_agent",
            Self::StrategyAgent => "strategy_agent",
            Self::ResourceAgent => "resource_agent",
            Self::NegotiationAgent => "negotiation_agent",
            Self::PerformanceAgent => "performance_agent",
        }
    }

    /// Parse a snake-case tag. Returns `None` for unknown tags.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl core::fmt::Display for AgentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// The kind of edge between two agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    /// A peer link whose strength adapts to endpoint performance.
    #[serde(rename = "collaboration")]
    Collaboration,
    /// A lineage link created once at spawn time. Never adapted.
    #[serde(rename = "parent-child")]
    ParentChild,
}

impl RelationshipType {
    /// The tag used by external collaborators.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collaboration => "collaboration",
            Self::ParentChild => "parent-child",
        }
    }
}

impl core::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// A business metric the evaluator knows how to weight.
///
/// The metric source reports names as free-form strings; names that do not
/// parse into one of these variants are ignored by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    /// Period-over-period revenue growth.
    RevenueGrowth,
    /// Output per unit of spend.
    CostEfficiency,
    /// Customer satisfaction index.
    CustomerSatisfaction,
    /// Share of the addressable market.
    MarketShare,
    /// Innovation index.
    InnovationIndex,
}

impl MetricName {
    /// Every recognised metric, in a fixed order.
    pub const ALL: [Self; 5] = [
        Self::RevenueGrowth,
        Self::CostEfficiency,
        Self::CustomerSatisfaction,
        Self::MarketShare,
        Self::InnovationIndex,
    ];

    /// The snake-case name used by the metric source.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RevenueGrowth => "revenue_growth",
            Self::CostEfficiency => "cost_efficiency",
            Self::CustomerSatisfaction => "customer_satisfaction",
            Self::MarketShare => "market_share",
            Self::InnovationIndex => "innovation_index",
        }
    }

    /// Parse a metric name. Returns `None` for unrecognised names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Why an agent exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationReason {
    /// Part of the bootstrap population.
    Seed,
    /// Spawned from a high-performing parent.
    Descendant,
    /// Spawned by the gap scanner to cover an under-represented type.
    MarketGapFill,
}

/// Why an agent was destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestroyReason {
    /// Score fell below the destroy threshold.
    PoorPerformance,
    /// Negative cash flow and the risk draw hit.
    CashFlowRisk,
}

impl core::fmt::Display for DestroyReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PoorPerformance => f.write_str("poor_performance"),
            Self::CashFlowRisk => f.write_str("cash_flow_risk"),
        }
    }
}

/// The kind of lifecycle event handed to the publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// An agent's score was recomputed.
    PerformanceUpdated,
    /// A new agent joined the population.
    AgentCreated,
    /// An agent was logically deleted.
    AgentDestroyed,
}

impl EventType {
    /// The snake-case tag for this event type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerformanceUpdated => "performance_updated",
            Self::AgentCreated => "agent_created",
            Self::AgentDestroyed => "agent_destroyed",
        }
    }
}

impl core::fmt::Display for EventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_type_tags_round_trip() {
        for t in AgentType::ALL {
            assert_eq!(AgentType::from_name(t.as_str()), Some(t));
        }
        assert_eq!(AgentType::from_name("sales_agent"), None);
    }

    #[test]
    fn serde_tags_match_as_str() {
        let json = serde_json::to_string(&AgentType::NegotiationAgent).ok();
        assert_eq!(json.as_deref(), Some("\"negotiation_agent\""));
        let json = serde_json::to_string(&RelationshipType::ParentChild).ok();
        assert_eq!(json.as_deref(), Some("\"parent-child\""));
        let json = serde_json::to_string(&DestroyReason::PoorPerformance).ok();
        assert_eq!(json.as_deref(), Some("\"poor_performance\""));
    }

    #[test]
    fn unknown_metric_names_do_not_parse() {
        assert_eq!(
            MetricName::from_name("market_share"),
            Some(MetricName::MarketShare)
        );
        assert_eq!(MetricName::from_name("churn_rate"), None);
    }
}
