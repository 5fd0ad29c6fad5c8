//! The evaluation tick: rescore every active agent, then apply the
//! lifecycle decision to it.
//!
//! Per agent, in order: query trailing metrics, compute the new score,
//! store it, publish `performance_updated`, decide, and destroy or spawn.
//! The agent list is read once at the start, so descendants created
//! during the tick are first evaluated on the next one. A failure at any
//! step skips the rest of that agent's steps and the tick moves on.

use chrono::TimeDelta;
use plasticity_agents::{RandomSource, evaluate_score};
use plasticity_db::{AgentStore, MetricSource};
use plasticity_types::{Agent, EventDetails, PerformanceUpdatedDetails};
use tracing::{debug, info, warn};

use crate::control_loop::{ControlLoop, next_tick};
use crate::error::ControlError;
use crate::events::EventPublisher;
use crate::lifecycle::LifecycleOutcome;
use crate::summary::EvaluationSummary;

impl<S, M, P, R> ControlLoop<S, M, P, R>
where
    S: AgentStore,
    M: MetricSource,
    P: EventPublisher,
    R: RandomSource + Send,
{
    /// Run one evaluation tick over the whole active population.
    ///
    /// Never fails: collaborator errors are logged and counted in
    /// [`EvaluationSummary::failures`].
    pub async fn run_evaluation_tick(&mut self) -> EvaluationSummary {
        let tick = next_tick(&mut self.counters.evaluation);
        let mut summary = EvaluationSummary {
            tick,
            ..EvaluationSummary::default()
        };

        let agents = match self.guarded("active_agents", self.store.active_agents()).await {
            Ok(agents) => agents,
            Err(e) => {
                warn!(tick, error = %e, "Evaluation tick could not list agents");
                summary.failures = 1;
                return summary;
            }
        };
        info!(tick, agents = agents.len(), "Evaluation tick starting");

        let mut active = agents.len();
        for agent in &agents {
            match self.evaluate_agent(agent, active).await {
                Ok(outcome) => {
                    summary.evaluated = summary.evaluated.saturating_add(1);
                    match outcome {
                        LifecycleOutcome::Retained => {}
                        LifecycleOutcome::Destroyed => {
                            summary.destroyed = summary.destroyed.saturating_add(1);
                            active = active.saturating_sub(1);
                        }
                        LifecycleOutcome::Spawned => {
                            summary.spawned = summary.spawned.saturating_add(1);
                            active = active.saturating_add(1);
                        }
                        LifecycleOutcome::SpawnBlocked => {
                            summary.spawns_blocked = summary.spawns_blocked.saturating_add(1);
                        }
                    }
                }
                Err(e) => {
                    warn!(tick, agent_id = %agent.id, error = %e, "Agent evaluation failed, skipping");
                    summary.failures = summary.failures.saturating_add(1);
                }
            }
        }

        info!(
            tick,
            evaluated = summary.evaluated,
            destroyed = summary.destroyed,
            spawned = summary.spawned,
            spawns_blocked = summary.spawns_blocked,
            failures = summary.failures,
            "Evaluation tick complete"
        );
        summary
    }

    /// Rescore one agent and apply its lifecycle decision.
    async fn evaluate_agent(
        &mut self,
        agent: &Agent,
        active: usize,
    ) -> Result<LifecycleOutcome, ControlError> {
        let window = TimeDelta::hours(i64::from(self.config.evaluation.lookback_hours));
        let metrics = self
            .guarded("metric_query", self.metrics.query(agent.id, window))
            .await?;

        let new_score = evaluate_score(agent.performance_score, &metrics, &self.config.evaluation);
        let updated = self
            .guarded(
                "update_performance",
                self.store.update_performance(agent.id, new_score),
            )
            .await?;

        debug!(
            agent_id = %agent.id,
            previous = %agent.performance_score,
            score = %new_score,
            metrics = metrics.len(),
            "Performance updated"
        );
        self.emit(
            agent.id,
            EventDetails::PerformanceUpdated(PerformanceUpdatedDetails {
                previous_score: agent.performance_score,
                new_score,
                metrics_considered: u32::try_from(metrics.len()).unwrap_or(u32::MAX),
            }),
        );

        self.apply_lifecycle(&updated, active).await
    }
}
