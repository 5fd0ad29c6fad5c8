//! Per-tick summaries and the scheduler's run report.
//!
//! Each tick procedure returns its summary so tests can assert on it and
//! the scheduler can log it. Counts cover what the tick attempted; a
//! caught collaborator failure shows up in `failures`, not as an error.

use plasticity_types::AgentType;
use serde::Serialize;

/// Outcome of one evaluation tick (scoring plus lifecycle).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationSummary {
    /// Evaluation tick number, starting at 1.
    pub tick: u64,
    /// Agents whose score was recomputed and stored.
    pub evaluated: u32,
    /// Agents destroyed this tick.
    pub destroyed: u32,
    /// Descendants created this tick.
    pub spawned: u32,
    /// Spawn decisions skipped because the population cap was reached.
    pub spawns_blocked: u32,
    /// Agents skipped after a collaborator failure.
    pub failures: u32,
}

/// Outcome of one network optimization tick (reinforcement plus
/// rebalancing).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    /// Optimization tick number, starting at 1.
    pub tick: u64,
    /// Collaboration edges whose strength was written.
    pub strengthened: u32,
    /// Collaboration edges already at their reinforced value.
    pub unchanged: u32,
    /// Edges skipped because an endpoint is destroyed or missing.
    pub skipped_inactive: u32,
    /// Agents whose computational allocation was written.
    pub rebalanced: u32,
    /// Writes that failed and were skipped.
    pub failures: u32,
}

/// Outcome of one gap scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GapScanSummary {
    /// Gap scan tick number, starting at 1.
    pub tick: u64,
    /// Types under the share threshold.
    pub gaps: Vec<AgentType>,
    /// Types for which an agent was created.
    pub spawned: Vec<AgentType>,
    /// Gap fills that failed and were skipped.
    pub failures: u32,
}

/// Tick counts for one scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerReport {
    /// Evaluation ticks executed.
    pub evaluation_ticks: u64,
    /// Network optimization ticks executed.
    pub optimization_ticks: u64,
    /// Gap scans executed.
    pub gap_scan_ticks: u64,
    /// Due ticks skipped because the scheduler was paused.
    pub skipped_while_paused: u64,
}
