//! Outbound event publishing.
//!
//! Events are handed to an [`EventPublisher`] after the mutation they
//! describe has been stored. Publication is best-effort and at-most-once:
//! `publish` never blocks the tick and never reports failure back to it.

use std::sync::Arc;

use plasticity_types::Event;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Capacity of the in-process event channel.
///
/// A subscriber that falls behind by more than this many events receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest event.
pub const BROADCAST_CAPACITY: usize = 1024;

/// A fire-and-forget sink for lifecycle events.
pub trait EventPublisher: Send + Sync {
    /// Hand one event to subscribers. Must not block.
    fn publish(&self, event: Event);
}

impl<P: EventPublisher + ?Sized> EventPublisher for Arc<P> {
    fn publish(&self, event: Event) {
        (**self).publish(event);
    }
}

/// Publishes events on a `tokio` broadcast channel for in-process
/// subscribers.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    tx: broadcast::Sender<Event>,
}

impl BroadcastPublisher {
    /// Create a publisher with [`BROADCAST_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(BROADCAST_CAPACITY)
    }

    /// Create a publisher with a custom channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for BroadcastPublisher {
    fn publish(&self, event: Event) {
        let event_type = event.event_type();
        if self.tx.send(event).is_err() {
            debug!(%event_type, "No event subscribers, event dropped");
        }
    }
}

/// Writes every event to the log. Used when no external sink is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPublisher;

impl EventPublisher for LogPublisher {
    fn publish(&self, event: Event) {
        match serde_json::to_string(&event.details) {
            Ok(details) => info!(
                event_id = %event.id,
                event_type = %event.event_type(),
                agent_id = %event.agent_id,
                details,
                "Event"
            ),
            Err(e) => warn!(
                event_id = %event.id,
                event_type = %event.event_type(),
                agent_id = %event.agent_id,
                error = %e,
                "Failed to serialize event details"
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use plasticity_types::{AgentId, EventDetails, EventType, PerformanceUpdatedDetails};
    use rust_decimal_macros::dec;

    use super::*;

    fn event() -> Event {
        Event::new(
            AgentId::new(),
            EventDetails::PerformanceUpdated(PerformanceUpdatedDetails {
                previous_score: dec!(60),
                new_score: dec!(62),
                metrics_considered: 2,
            }),
        )
    }

    #[tokio::test]
    async fn subscribers_receive_events() {
        let publisher = BroadcastPublisher::new();
        let mut rx = publisher.subscribe();
        let sent = event();
        publisher.publish(sent.clone());
        let received = rx.recv().await.unwrap();
        assert_eq!(received, sent);
        assert_eq!(received.event_type(), EventType::PerformanceUpdated);
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let publisher = BroadcastPublisher::new();
        publisher.publish(event());
        LogPublisher.publish(event());
    }

    #[test]
    fn log_publisher_accepts_every_event_type() {
        use plasticity_types::{
            AgentCreatedDetails, AgentDestroyedDetails, AgentType, CreationReason, DestroyReason,
        };

        LogPublisher.publish(event());
        LogPublisher.publish(Event::new(
            AgentId::new(),
            EventDetails::AgentCreated(AgentCreatedDetails {
                name: String::from("Broker-Delta"),
                agent_type: AgentType::NegotiationAgent,
                reason: CreationReason::MarketGapFill,
                parent_id: None,
                performance_score: dec!(60),
                cash_flow: dec!(2000),
            }),
        ));
        LogPublisher.publish(Event::new(
            AgentId::new(),
            EventDetails::AgentDestroyed(AgentDestroyedDetails {
                reason: DestroyReason::PoorPerformance,
                final_score: dec!(41),
                cash_flow: dec!(-10),
            }),
        ));
    }

    #[test]
    fn arc_publisher_forwards() {
        let inner = BroadcastPublisher::new();
        let mut rx = inner.subscribe();
        let shared: Arc<BroadcastPublisher> = Arc::new(inner);
        shared.publish(event());
        assert!(rx.try_recv().is_ok());
    }
}
