//! Engine binary for the Plasticity population manager.
//!
//! Wires the control loop to its collaborators, seeds an empty
//! population, and runs the scheduler until Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `PLASTICITY_CONFIG` or `plasticity-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the random source, agent store, and metric source
//! 4. Connect the event sink (NATS when configured, the log otherwise)
//! 5. Seed the population when the store is empty
//! 6. Install the Ctrl-C handler
//! 7. Run the scheduler until a stop is requested
//! 8. Log the run report and the final population

mod error;
mod publisher;
mod seed;

use std::path::PathBuf;
use std::sync::Arc;

use plasticity_agents::SeededRandom;
use plasticity_core::config::LoggingConfig;
use plasticity_core::{
    ControlLoop, LogFormat, LogPublisher, PlasticityConfig, Scheduler, SchedulerControl,
};
use plasticity_db::{InMemoryAgentStore, InMemoryMetricSource};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::publisher::{EnginePublisher, NatsPublisher};

/// Config file used when `PLASTICITY_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "plasticity-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, logging, the NATS connection, or
/// seeding fails. Tick-level failures are logged and never end the run.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging)?;
    info!("plasticity-engine starting");
    info!(
        evaluation_secs = config.schedule.evaluation_interval_secs,
        optimization_secs = config.schedule.optimization_interval_secs,
        gap_scan_secs = config.schedule.gap_scan_interval_secs,
        max_population = config.lifecycle.max_population,
        collaborator_timeout_ms = config.infrastructure.collaborator_timeout_ms,
        "Configuration loaded"
    );

    // 3. Collaborators.
    let mut rng = match config.population.rng_seed {
        Some(seed) => {
            info!(seed, "Using seeded random source");
            SeededRandom::from_seed(seed)
        }
        None => SeededRandom::from_entropy(),
    };
    let store = Arc::new(InMemoryAgentStore::new());
    let metrics = Arc::new(InMemoryMetricSource::new());

    // 4. Event sink.
    let (publisher, forwarder) = match &config.infrastructure.nats_url {
        Some(url) => {
            let (publisher, handle) = NatsPublisher::connect(url).await?;
            (EnginePublisher::Nats(publisher), Some(handle))
        }
        None => {
            info!("No NATS URL configured, events go to the log");
            (EnginePublisher::Log(LogPublisher), None)
        }
    };

    // 5. Seed.
    let seeded =
        seed::seed_population(store.as_ref(), &publisher, &config.population, &mut rng).await?;
    info!(
        agents = seeded.agents.len(),
        collaborations = seeded.collaborations,
        "Population ready"
    );

    // 6. Ctrl-C.
    let control = Arc::new(SchedulerControl::new());
    spawn_shutdown_listener(Arc::clone(&control));

    // 7. Run.
    let control_loop = ControlLoop::new(store, metrics, publisher, rng, config);
    let mut scheduler = Scheduler::new(control_loop, control);
    let report = scheduler.run().await;

    // 8. Report.
    let stats = scheduler.control_loop().population_stats().await?;
    info!(
        evaluation_ticks = report.evaluation_ticks,
        optimization_ticks = report.optimization_ticks,
        gap_scan_ticks = report.gap_scan_ticks,
        skipped_while_paused = report.skipped_while_paused,
        active = stats.active,
        destroyed = stats.destroyed,
        mean_score = %stats.mean_score,
        "Run complete"
    );

    // Dropping the scheduler closes the event queue so the forwarder drains.
    drop(scheduler);
    if let Some(handle) = forwarder {
        if let Err(e) = handle.await {
            warn!(error = %e, "NATS forwarder task failed");
        }
    }

    info!("plasticity-engine shutdown complete");
    Ok(())
}

/// Load configuration from `PLASTICITY_CONFIG`, or `plasticity-config.yaml`
/// in the working directory. A missing file means defaults.
fn load_config() -> Result<PlasticityConfig, EngineError> {
    let path = std::env::var_os("PLASTICITY_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        Ok(PlasticityConfig::from_file(&path)?)
    } else {
        let mut config = PlasticityConfig::default();
        config.infrastructure.apply_env_overrides();
        Ok(config)
    }
}

/// Install the `fmt` subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    installed.map_err(|e| EngineError::Logging {
        message: e.to_string(),
    })
}

/// Request a stop on Ctrl-C. The tick in flight finishes first.
fn spawn_shutdown_listener(control: Arc<SchedulerControl>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping after the current tick");
                control.request_stop();
            }
            Err(e) => {
                warn!(error = %e, "Could not listen for Ctrl-C");
            }
        }
    });
}
