//! The control loop: collaborators, tunables, and shared tick plumbing.
//!
//! [`ControlLoop`] owns everything a tick needs: the agent store, the
//! metric source, the event publisher, the random source, and the config.
//! The three tick procedures live in sibling modules as further `impl`
//! blocks:
//!
//! - [`run_evaluation_tick`](ControlLoop::run_evaluation_tick) in `evaluation`
//! - [`run_network_tick`](ControlLoop::run_network_tick) in `network`
//! - [`run_gap_scan_tick`](ControlLoop::run_gap_scan_tick) in `gap_scan`
//!
//! Ticks are plain async methods so tests can drive them one at a time;
//! the [`Scheduler`](crate::scheduler::Scheduler) only adds intervals
//! around them.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use plasticity_agents::{AgentBlueprint, RandomSource, build_agent, population_stats};
use plasticity_db::{AgentStore, MetricSource};
use plasticity_types::{Agent, AgentCreatedDetails, AgentId, Event, EventDetails, PopulationStats};

use crate::config::PlasticityConfig;
use crate::error::ControlError;
use crate::events::EventPublisher;

/// Per-kind tick numbers, incremented as each tick starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TickCounters {
    pub(crate) evaluation: u64,
    pub(crate) optimization: u64,
    pub(crate) gap_scan: u64,
}

/// Advance a tick counter and return the new tick number.
pub(crate) const fn next_tick(counter: &mut u64) -> u64 {
    *counter = counter.saturating_add(1);
    *counter
}

/// The population control loop.
///
/// Generic over its collaborators so production code and tests inject
/// their own store, metric source, publisher, and random source.
pub struct ControlLoop<S, M, P, R> {
    pub(crate) store: Arc<S>,
    pub(crate) metrics: Arc<M>,
    pub(crate) publisher: P,
    pub(crate) rng: R,
    pub(crate) config: PlasticityConfig,
    pub(crate) counters: TickCounters,
}

impl<S, M, P, R> ControlLoop<S, M, P, R>
where
    S: AgentStore,
    M: MetricSource,
    P: EventPublisher,
    R: RandomSource + Send,
{
    /// Assemble a control loop from its collaborators.
    pub fn new(
        store: Arc<S>,
        metrics: Arc<M>,
        publisher: P,
        rng: R,
        config: PlasticityConfig,
    ) -> Self {
        Self {
            store,
            metrics,
            publisher,
            rng,
            config,
            counters: TickCounters::default(),
        }
    }

    /// The active configuration.
    pub const fn config(&self) -> &PlasticityConfig {
        &self.config
    }

    /// The agent store.
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The event publisher.
    pub const fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Census of the store: active and destroyed counts, per-type counts,
    /// mean active score.
    pub async fn population_stats(&self) -> Result<PopulationStats, ControlError> {
        let agents = self.guarded("all_agents", self.store.all_agents()).await?;
        Ok(population_stats(&agents))
    }

    /// Run one collaborator call under the configured timeout.
    pub(crate) async fn guarded<T, E>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, E>>,
    ) -> Result<T, ControlError>
    where
        ControlError: From<E>,
    {
        let limit = self.config.infrastructure.collaborator_timeout();
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result.map_err(ControlError::from),
            Err(_elapsed) => Err(ControlError::Timeout {
                operation,
                timeout_ms: self.config.infrastructure.collaborator_timeout_ms,
            }),
        }
    }

    /// Hand an event to the publisher.
    pub(crate) fn emit(&self, agent_id: AgentId, details: EventDetails) {
        self.publisher.publish(Event::new(agent_id, details));
    }

    /// Materialize a blueprint and store it. The caller announces it with
    /// [`announce_created`](Self::announce_created) once any links are in
    /// place.
    pub(crate) async fn create_agent(
        &mut self,
        blueprint: &AgentBlueprint,
    ) -> Result<Agent, ControlError> {
        let agent = build_agent(blueprint, &mut self.rng, Utc::now());
        self.guarded("insert_agent", self.store.insert_agent(agent.clone()))
            .await?;
        Ok(agent)
    }

    /// Publish `agent_created` for a stored agent.
    pub(crate) fn announce_created(&self, agent: &Agent) {
        self.emit(
            agent.id,
            EventDetails::AgentCreated(AgentCreatedDetails {
                name: agent.name.clone(),
                agent_type: agent.agent_type,
                reason: agent.creation_reason,
                parent_id: agent.parent_id,
                performance_score: agent.performance_score,
                cash_flow: agent.cash_flow,
            }),
        );
    }
}
