//! Domain event → channel routing.
//!
//! Appointment events reach the patient, the assigned doctor, and the
//! clinical staff role channel. Notification events reach their recipient.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use clinic_core::events::{AppointmentEvent, DomainEvent, EventPayload, NotificationEvent};
use clinic_core::traits::EventPublisher;
use clinic_entity::user::UserRole;

use crate::channel::ChannelType;
use crate::message::OutboundMessage;
use crate::pubsub::MemoryPubSub;

/// Bridges domain events into the realtime system.
#[derive(Debug, Clone)]
pub struct EventBridge {
    pubsub: Arc<MemoryPubSub>,
}

impl EventBridge {
    /// Create a new event bridge
    pub fn new(pubsub: Arc<MemoryPubSub>) -> Self {
        Self { pubsub }
    }

    /// Channels an event is delivered on.
    pub fn route(event: &DomainEvent) -> Vec<ChannelType> {
        let staff = ChannelType::Role(UserRole::ClinicalStaff);
        match &event.payload {
            EventPayload::Appointment(AppointmentEvent::Created { patient_id, .. }) => {
                vec![ChannelType::User(*patient_id), staff]
            }
            EventPayload::Appointment(AppointmentEvent::StatusChanged {
                patient_id,
                doctor_id,
                ..
            }) => {
                let mut channels = vec![ChannelType::User(*patient_id)];
                channels.extend(doctor_id.map(ChannelType::User));
                channels.push(staff);
                channels
            }
            EventPayload::Notification(NotificationEvent::Delivered { user_id, .. }) => {
                vec![ChannelType::User(*user_id)]
            }
        }
    }
}

#[async_trait]
impl EventPublisher for EventBridge {
    async fn publish(&self, event: DomainEvent) {
        let msg = OutboundMessage::from_event(&event);
        for channel in Self::route(&event) {
            let name = channel.to_channel_string();
            let reached = self.pubsub.publish(&name, msg.clone()).await;
            debug!(event_id = %event.id, channel = %name, reached, "Published realtime event");
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn status_changed(patient: Uuid, doctor: Option<Uuid>) -> DomainEvent {
        DomainEvent::new(
            None,
            EventPayload::Appointment(AppointmentEvent::StatusChanged {
                appointment_id: Uuid::new_v4(),
                patient_id: patient,
                doctor_id: doctor,
                action: "assign".into(),
                from_status: "under_review".into(),
                to_status: "assigned".into(),
            }),
        )
    }

    #[test]
    fn test_status_change_routes_to_patient_doctor_and_staff() {
        let patient = Uuid::new_v4();
        let doctor = Uuid::new_v4();
        let channels = EventBridge::route(&status_changed(patient, Some(doctor)));
        assert_eq!(
            channels,
            vec![
                ChannelType::User(patient),
                ChannelType::User(doctor),
                ChannelType::Role(UserRole::ClinicalStaff),
            ]
        );
        assert_eq!(EventBridge::route(&status_changed(patient, None)).len(), 2);
    }

    #[tokio::test]
    async fn test_notification_reaches_only_recipient() {
        let pubsub = Arc::new(MemoryPubSub::new(8));
        let recipient = Uuid::new_v4();
        let mut inbox = pubsub.subscribe(&format!("user:{recipient}")).await;
        let mut staff = pubsub.subscribe("role:clinical_staff").await;

        let bridge = EventBridge::new(pubsub.clone());
        bridge
            .publish(DomainEvent::new(
                None,
                EventPayload::Notification(NotificationEvent::Delivered {
                    notification_id: Uuid::new_v4(),
                    user_id: recipient,
                    title: "Appointment Confirmed".into(),
                    message: "See you soon".into(),
                    kind: "success".into(),
                }),
            ))
            .await;

        match inbox.recv().await.unwrap() {
            OutboundMessage::Notification { title, .. } => assert_eq!(title, "Appointment Confirmed"),
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(staff.try_recv().is_err());
    }
}
