//! Event sinks for the engine: NATS forwarding or plain logging.
//!
//! The control loop publishes synchronously from inside a tick, so the
//! NATS sink queues events on a bounded channel and one background task
//! drains it in order. A full queue drops the event with a warning rather
//! than blocking the tick. Each event is published as JSON on
//! `plasticity.events.<event_type>`. Serialization or publish failures
//! are logged and never reach the loop.

use plasticity_core::{EventPublisher, LogPublisher};
use plasticity_types::{Event, EventType};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::EngineError;

/// Subject prefix for forwarded events.
pub const SUBJECT_PREFIX: &str = "plasticity.events";

/// Events queued for the forwarder before new ones are dropped.
pub const QUEUE_CAPACITY: usize = 1024;

/// NATS subject for an event type, e.g. `plasticity.events.agent_created`.
pub fn subject_for(event_type: EventType) -> String {
    format!("{SUBJECT_PREFIX}.{}", event_type.as_str())
}

/// Queues events for the background NATS forwarder.
#[derive(Debug, Clone)]
pub struct NatsPublisher {
    tx: mpsc::Sender<Event>,
}

impl NatsPublisher {
    /// Connect to a NATS server and start the forwarder task.
    ///
    /// The returned handle completes once every publisher clone has been
    /// dropped and the queue is flushed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Nats`] if the connection cannot be established.
    pub async fn connect(url: &str) -> Result<(Self, JoinHandle<()>), EngineError> {
        info!(url = url, "Connecting to NATS");
        let client = async_nats::connect(url)
            .await
            .map_err(|e| EngineError::Nats {
                message: format!("failed to connect to {url}: {e}"),
            })?;
        info!("NATS connection established");

        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let handle = tokio::spawn(forward(client, rx));
        Ok((Self { tx }, handle))
    }
}

impl EventPublisher for NatsPublisher {
    fn publish(&self, event: Event) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(
                    event_id = %event.id,
                    capacity = QUEUE_CAPACITY,
                    "NATS queue full, event dropped"
                );
            }
            Err(TrySendError::Closed(event)) => {
                warn!(event_id = %event.id, "NATS forwarder stopped, event dropped");
            }
        }
    }
}

async fn forward(client: async_nats::Client, mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        let subject = subject_for(event.event_type());
        let payload = match serde_json::to_vec(&event) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(subject = subject, error = %e, "Failed to serialize event");
                continue;
            }
        };
        debug!(subject = subject, agent_id = %event.agent_id, "Forwarding event");
        if let Err(e) = client.publish(subject.clone(), payload.into()).await {
            warn!(subject = subject, error = %e, "Failed to publish event");
        }
    }
    if let Err(e) = client.flush().await {
        warn!(error = %e, "Failed to flush NATS connection");
    }
    debug!("NATS forwarder finished");
}

/// The sink the engine runs with.
#[derive(Debug, Clone)]
pub enum EnginePublisher {
    /// Forward to NATS.
    Nats(NatsPublisher),
    /// Log each event.
    Log(LogPublisher),
}

impl EventPublisher for EnginePublisher {
    fn publish(&self, event: Event) {
        match self {
            Self::Nats(publisher) => publisher.publish(event),
            Self::Log(publisher) => publisher.publish(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use plasticity_types::{AgentDestroyedDetails, AgentId, DestroyReason, EventDetails};
    use rust_decimal_macros::dec;

    use super::*;

    fn destroyed_event() -> Event {
        Event::new(
            AgentId::new(),
            EventDetails::AgentDestroyed(AgentDestroyedDetails {
                reason: DestroyReason::CashFlowRisk,
                final_score: dec!(62),
                cash_flow: dec!(-4000),
            }),
        )
    }

    #[test]
    fn subjects_follow_event_type() {
        assert_eq!(
            subject_for(EventType::AgentCreated),
            "plasticity.events.agent_created"
        );
        assert_eq!(
            subject_for(EventType::PerformanceUpdated),
            "plasticity.events.performance_updated"
        );
    }

    #[test]
    fn publish_after_forwarder_exit_is_harmless() {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        drop(rx);
        let publisher = EnginePublisher::Nats(NatsPublisher { tx });
        publisher.publish(destroyed_event());
    }

    #[test]
    fn queued_events_keep_order() {
        let (tx, mut rx) = mpsc::channel(QUEUE_CAPACITY);
        let publisher = NatsPublisher { tx };
        let first = destroyed_event();
        let second = destroyed_event();
        publisher.publish(first.clone());
        publisher.publish(second.clone());
        assert_eq!(rx.try_recv().ok(), Some(first));
        assert_eq!(rx.try_recv().ok(), Some(second));
    }

    #[test]
    fn full_queue_drops_instead_of_blocking() {
        let (tx, mut rx) = mpsc::channel(1);
        let publisher = NatsPublisher { tx };
        let kept = destroyed_event();
        publisher.publish(kept.clone());
        publisher.publish(destroyed_event());
        assert_eq!(rx.try_recv().ok(), Some(kept));
        assert!(rx.try_recv().is_err());

        // Room again once the forwarder catches up.
        let next = destroyed_event();
        publisher.publish(next.clone());
        assert_eq!(rx.try_recv().ok(), Some(next));
    }

    #[test]
    fn log_sink_accepts_events() {
        EnginePublisher::Log(LogPublisher).publish(destroyed_event());
    }
}
