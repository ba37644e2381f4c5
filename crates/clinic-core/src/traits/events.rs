//! Event publishing trait implemented by the realtime bus.

use async_trait::async_trait;

use crate::events::DomainEvent;

/// Sink for domain events.
///
/// Publishing is fire-and-forget: a subscriber that is gone or lagging
/// never fails the operation that produced the event.
#[async_trait]
pub trait EventPublisher: Send + Sync + std::fmt::Debug + 'static {
    /// Publish an event to every interested subscriber.
    async fn publish(&self, event: DomainEvent);
}

/// Publisher that drops every event. Used by the CLI, which has no
/// realtime subscribers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _event: DomainEvent) {}
}
