//! Per-connection subscriptions over the shared pub/sub.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;
use uuid::Uuid;

use clinic_entity::user::UserRole;

use crate::bridge::EventBridge;
use crate::channel::ChannelType;
use crate::message::OutboundMessage;
use crate::pubsub::MemoryPubSub;

const CHANNEL_BUFFER: usize = 256;

/// Entry point for the WebSocket layer.
#[derive(Debug, Clone)]
pub struct RealtimeHub {
    pubsub: Arc<MemoryPubSub>,
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new(CHANNEL_BUFFER)
    }
}

impl RealtimeHub {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            pubsub: Arc::new(MemoryPubSub::new(buffer_size)),
        }
    }

    /// Publisher to hand to the service layer.
    pub fn publisher(&self) -> EventBridge {
        EventBridge::new(self.pubsub.clone())
    }

    /// Subscribe a connection to its user and role channels.
    pub async fn connect(&self, user_id: Uuid, role: UserRole) -> Subscription {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER);
        let channels = ChannelType::defaults_for(user_id, role);
        let mut forwarders = Vec::with_capacity(channels.len());

        for channel in &channels {
            let name = channel.to_channel_string();
            let mut source = self.pubsub.subscribe(&name).await;
            let tx = tx.clone();
            forwarders.push(tokio::spawn(async move {
                loop {
                    match source.recv().await {
                        Ok(msg) => {
                            if tx.send(msg).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(channel = %name, skipped, "Realtime subscriber lagged");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }));
        }

        Subscription {
            channels: channels.iter().map(ChannelType::to_channel_string).collect(),
            rx,
            forwarders,
        }
    }

    /// Drop channels nobody listens on anymore.
    pub async fn prune(&self) -> usize {
        self.pubsub.prune().await
    }
}

/// Merged message stream for one connection. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    /// Channel names this connection listens on.
    pub channels: Vec<String>,
    rx: mpsc::Receiver<OutboundMessage>,
    forwarders: Vec<JoinHandle<()>>,
}

impl Subscription {
    /// Next message for this connection.
    pub async fn recv(&mut self) -> Option<OutboundMessage> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        for task in &self.forwarders {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use clinic_core::events::{AppointmentEvent, DomainEvent, EventPayload};
    use clinic_core::traits::EventPublisher;

    use super::*;

    #[tokio::test]
    async fn test_staff_connection_sees_new_requests() {
        let hub = RealtimeHub::default();
        let staff_id = Uuid::new_v4();
        let mut sub = hub.connect(staff_id, UserRole::ClinicalStaff).await;
        assert_eq!(
            sub.channels,
            vec![format!("user:{staff_id}"), "role:clinical_staff".to_string()]
        );

        let patient = Uuid::new_v4();
        hub.publisher()
            .publish(DomainEvent::new(
                Some(patient),
                EventPayload::Appointment(AppointmentEvent::Created {
                    appointment_id: Uuid::new_v4(),
                    patient_id: patient,
                }),
            ))
            .await;

        match sub.recv().await.unwrap() {
            OutboundMessage::AppointmentCreated { patient_id, .. } => assert_eq!(patient_id, patient),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dropping_subscription_releases_channels() {
        let hub = RealtimeHub::default();
        let sub = hub.connect(Uuid::new_v4(), UserRole::Student).await;
        drop(sub);
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(hub.prune().await, 2);
    }
}
