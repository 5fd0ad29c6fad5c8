//! The gap scan tick: spawn agents of under-represented types.
//!
//! The type distribution is computed once from the active population at
//! the start of the scan. Each gap then gets one independent draw; a hit
//! creates one `market_gap_fill` agent of that type.

use plasticity_agents::{AgentBlueprint, RandomSource, type_distribution, under_represented};
use plasticity_db::{AgentStore, MetricSource};
use plasticity_types::CreationReason;
use tracing::{debug, info, warn};

use crate::control_loop::{ControlLoop, next_tick};
use crate::events::EventPublisher;
use crate::summary::GapScanSummary;

impl<S, M, P, R> ControlLoop<S, M, P, R>
where
    S: AgentStore,
    M: MetricSource,
    P: EventPublisher,
    R: RandomSource + Send,
{
    /// Run one gap scan.
    ///
    /// Never fails: collaborator errors are logged and counted in
    /// [`GapScanSummary::failures`].
    pub async fn run_gap_scan_tick(&mut self) -> GapScanSummary {
        let tick = next_tick(&mut self.counters.gap_scan);
        let mut summary = GapScanSummary {
            tick,
            ..GapScanSummary::default()
        };

        let agents = match self.guarded("active_agents", self.store.active_agents()).await {
            Ok(agents) => agents,
            Err(e) => {
                warn!(tick, error = %e, "Gap scan could not list agents");
                summary.failures = 1;
                return summary;
            }
        };

        let distribution = type_distribution(&agents);
        summary.gaps = under_represented(&distribution, self.config.gap_scan.share_threshold_pct);
        info!(tick, agents = agents.len(), gaps = ?summary.gaps, "Gap scan starting");

        let mut active = agents.len();
        let gaps = summary.gaps.clone();
        for agent_type in gaps {
            if !self.rng.chance(self.config.gap_scan.fill_probability) {
                debug!(%agent_type, "Gap fill draw missed");
                continue;
            }
            if !self.config.lifecycle.has_capacity(active) {
                info!(
                    %agent_type,
                    active,
                    max_population = self.config.lifecycle.max_population,
                    "Population cap reached, gap not filled"
                );
                continue;
            }

            let blueprint = AgentBlueprint::new(
                agent_type,
                CreationReason::MarketGapFill,
                self.config.gap_scan.fill_score,
                self.config.gap_scan.fill_cash_flow,
            );
            match self.create_agent(&blueprint).await {
                Ok(agent) => {
                    info!(
                        agent_id = %agent.id,
                        name = %agent.name,
                        %agent_type,
                        share = %distribution.get(&agent_type).copied().unwrap_or_default(),
                        "Gap filled"
                    );
                    self.announce_created(&agent);
                    summary.spawned.push(agent_type);
                    active = active.saturating_add(1);
                }
                Err(e) => {
                    warn!(%agent_type, error = %e, "Gap fill failed, skipping");
                    summary.failures = summary.failures.saturating_add(1);
                }
            }
        }

        info!(
            tick,
            spawned = summary.spawned.len(),
            failures = summary.failures,
            "Gap scan complete"
        );
        summary
    }
}
