//! Periodic driver for the three tick procedures.
//!
//! One cooperative task selects over three `tokio::time::Interval`s, so
//! ticks never interleave and each tick finishes before the next one of
//! any kind starts. Intervals skip missed ticks rather than bursting to
//! catch up after a long tick. A stop request is checked before every
//! tick; the tick in flight when it arrives runs to completion.

use std::sync::Arc;

use plasticity_agents::RandomSource;
use plasticity_db::{AgentStore, MetricSource};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::ScheduleConfig;
use crate::control::SchedulerControl;
use crate::control_loop::ControlLoop;
use crate::events::EventPublisher;
use crate::summary::SchedulerReport;

/// Runs a [`ControlLoop`] on its configured schedule until stopped.
pub struct Scheduler<S, M, P, R> {
    control_loop: ControlLoop<S, M, P, R>,
    schedule: ScheduleConfig,
    control: Arc<SchedulerControl>,
}

impl<S, M, P, R> Scheduler<S, M, P, R>
where
    S: AgentStore,
    M: MetricSource,
    P: EventPublisher,
    R: RandomSource + Send,
{
    /// Wrap a control loop. The schedule is taken from its config.
    pub fn new(control_loop: ControlLoop<S, M, P, R>, control: Arc<SchedulerControl>) -> Self {
        let schedule = control_loop.config().schedule.clone();
        Self {
            control_loop,
            schedule,
            control,
        }
    }

    /// Shared control handle for pausing and stopping this scheduler.
    pub fn control(&self) -> Arc<SchedulerControl> {
        Arc::clone(&self.control)
    }

    /// The wrapped control loop.
    pub const fn control_loop(&self) -> &ControlLoop<S, M, P, R> {
        &self.control_loop
    }

    /// Run ticks as they come due until a stop is requested.
    ///
    /// Every kind fires once immediately, then on its period.
    pub async fn run(&mut self) -> SchedulerReport {
        let mut report = SchedulerReport::default();
        let control = Arc::clone(&self.control);

        let mut evaluation = time::interval(self.schedule.evaluation_interval());
        evaluation.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut optimization = time::interval(self.schedule.optimization_interval());
        optimization.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut gap_scan = time::interval(self.schedule.gap_scan_interval());
        gap_scan.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            evaluation_secs = self.schedule.evaluation_interval_secs,
            optimization_secs = self.schedule.optimization_interval_secs,
            gap_scan_secs = self.schedule.gap_scan_interval_secs,
            "Scheduler starting"
        );

        loop {
            tokio::select! {
                biased;

                () = control.stopped() => {
                    info!("Stop requested, scheduler exiting");
                    break;
                }
                _ = evaluation.tick() => {
                    if Self::should_run(&control, "evaluation", &mut report) {
                        let summary = self.control_loop.run_evaluation_tick().await;
                        debug!(?summary, "Evaluation summary");
                        report.evaluation_ticks = report.evaluation_ticks.saturating_add(1);
                    }
                }
                _ = optimization.tick() => {
                    if Self::should_run(&control, "network_optimization", &mut report) {
                        let summary = self.control_loop.run_network_tick().await;
                        debug!(?summary, "Network summary");
                        report.optimization_ticks = report.optimization_ticks.saturating_add(1);
                    }
                }
                _ = gap_scan.tick() => {
                    if Self::should_run(&control, "gap_scan", &mut report) {
                        let summary = self.control_loop.run_gap_scan_tick().await;
                        debug!(?summary, "Gap scan summary");
                        report.gap_scan_ticks = report.gap_scan_ticks.saturating_add(1);
                    }
                }
            }
        }

        info!(
            evaluation_ticks = report.evaluation_ticks,
            optimization_ticks = report.optimization_ticks,
            gap_scan_ticks = report.gap_scan_ticks,
            skipped_while_paused = report.skipped_while_paused,
            "Scheduler stopped"
        );
        report
    }

    /// Whether a due tick should run. A paused scheduler logs and counts
    /// the skip instead.
    fn should_run(
        control: &SchedulerControl,
        kind: &'static str,
        report: &mut SchedulerReport,
    ) -> bool {
        if control.is_paused() {
            info!(kind, "Scheduler paused, tick skipped");
            report.skipped_while_paused = report.skipped_while_paused.saturating_add(1);
            return false;
        }
        true
    }
}
