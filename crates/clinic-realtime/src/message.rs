//! Inbound and outbound WebSocket message type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clinic_core::events::{AppointmentEvent, DomainEvent, EventPayload, NotificationEvent};

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Application-level keepalive.
    Ping {
        /// Echoed back in the pong.
        timestamp: i64,
    },
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Sent once after the socket is authenticated.
    Connected {
        user_id: Uuid,
        channels: Vec<String>,
    },
    /// A new appointment request.
    AppointmentCreated {
        appointment_id: Uuid,
        patient_id: Uuid,
        timestamp: DateTime<Utc>,
    },
    /// An appointment changed status.
    AppointmentStatusChanged {
        appointment_id: Uuid,
        action: String,
        from_status: String,
        to_status: String,
        actor_id: Option<Uuid>,
        timestamp: DateTime<Utc>,
    },
    /// In-app notification delivery.
    Notification {
        id: Uuid,
        title: String,
        message: String,
        /// Display style (`info`, `success`, `warning`, `error`).
        kind: String,
        timestamp: DateTime<Utc>,
    },
    /// Reply to [`InboundMessage::Ping`].
    Pong { timestamp: i64 },
    /// Error message.
    Error { code: String, message: String },
}

impl OutboundMessage {
    /// Client-facing form of a domain event.
    pub fn from_event(event: &DomainEvent) -> Self {
        match &event.payload {
            EventPayload::Appointment(AppointmentEvent::Created {
                appointment_id,
                patient_id,
            }) => OutboundMessage::AppointmentCreated {
                appointment_id: *appointment_id,
                patient_id: *patient_id,
                timestamp: event.timestamp,
            },
            EventPayload::Appointment(AppointmentEvent::StatusChanged {
                appointment_id,
                action,
                from_status,
                to_status,
                ..
            }) => OutboundMessage::AppointmentStatusChanged {
                appointment_id: *appointment_id,
                action: action.clone(),
                from_status: from_status.clone(),
                to_status: to_status.clone(),
                actor_id: event.actor_id,
                timestamp: event.timestamp,
            },
            EventPayload::Notification(NotificationEvent::Delivered {
                notification_id,
                title,
                message,
                kind,
                ..
            }) => OutboundMessage::Notification {
                id: *notification_id,
                title: title.clone(),
                message: message.clone(),
                kind: kind.clone(),
                timestamp: event.timestamp,
            },
        }
    }

    /// Serialize for a text frame.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"type":"error","code":"SERIALIZATION","message":"unserializable message"}"#
                .to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_change_carries_actor() {
        let actor = Uuid::new_v4();
        let event = DomainEvent::new(
            Some(actor),
            EventPayload::Appointment(AppointmentEvent::StatusChanged {
                appointment_id: Uuid::nil(),
                patient_id: Uuid::new_v4(),
                doctor_id: None,
                action: "start_review".into(),
                from_status: "pending".into(),
                to_status: "under_review".into(),
            }),
        );
        let json: serde_json::Value =
            serde_json::from_str(&OutboundMessage::from_event(&event).to_json()).unwrap();
        assert_eq!(json["type"], "appointment_status_changed");
        assert_eq!(json["to_status"], "under_review");
        assert_eq!(json["actor_id"], actor.to_string());
    }

    #[test]
    fn test_parse_ping() {
        let msg: InboundMessage = serde_json::from_str(r#"{"type":"ping","timestamp":7}"#).unwrap();
        assert!(matches!(msg, InboundMessage::Ping { timestamp: 7 }));
    }
}
