//! Patient-facing notification text for each appointment status.

use serde::{Deserialize, Serialize};

use super::status::AppointmentStatus;

/// Display style of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Title, body and style for a status-change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Short title.
    pub title: String,
    /// Full message.
    pub message: String,
    /// Display style.
    #[serde(rename = "type")]
    pub kind: MessageType,
}

impl NotificationMessage {
    fn new(title: &str, message: String, kind: MessageType) -> Self {
        Self {
            title: title.to_string(),
            message,
            kind,
        }
    }
}

/// Values interpolated into the message text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageData {
    pub doctor_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub new_date: Option<String>,
    pub new_time: Option<String>,
    pub rejection_reason: Option<String>,
    pub cancellation_reason: Option<String>,
}

fn or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().unwrap_or(fallback)
}

/// Build the notification for `status` from `data`.
pub fn notification_message(status: AppointmentStatus, data: &MessageData) -> NotificationMessage {
    let (doctor, doctor_subject) = match &data.doctor_name {
        Some(name) => (format!("Dr. {name}"), format!("Dr. {name}")),
        None => ("your doctor".to_string(), "Your doctor".to_string()),
    };
    let date = or(&data.date, "the requested date");
    let time = or(&data.time, "the requested time");

    match status {
        AppointmentStatus::Pending => NotificationMessage::new(
            "Appointment Requested",
            format!(
                "Your appointment request for {date} at {time} has been received and is awaiting review."
            ),
            MessageType::Info,
        ),
        AppointmentStatus::UnderReview => NotificationMessage::new(
            "Appointment Under Review",
            format!("Clinic staff are reviewing your appointment request for {date}."),
            MessageType::Info,
        ),
        AppointmentStatus::Assigned => NotificationMessage::new(
            "Doctor Assigned",
            format!("{doctor_subject} has been assigned to your appointment on {date} at {time}."),
            MessageType::Info,
        ),
        AppointmentStatus::Confirmed => NotificationMessage::new(
            "Appointment Confirmed",
            format!("Your appointment with {doctor} on {date} at {time} is confirmed."),
            MessageType::Success,
        ),
        AppointmentStatus::Rescheduled => NotificationMessage::new(
            "Appointment Rescheduled",
            format!(
                "{doctor_subject} has rescheduled your appointment to {} at {}.",
                or(&data.new_date, date),
                or(&data.new_time, time)
            ),
            MessageType::Warning,
        ),
        AppointmentStatus::Rejected => NotificationMessage::new(
            "Appointment Rejected",
            format!(
                "Your appointment request for {date} was rejected. Reason: {}",
                or(&data.rejection_reason, "not specified")
            ),
            MessageType::Error,
        ),
        AppointmentStatus::Completed => NotificationMessage::new(
            "Appointment Completed",
            format!("Your appointment with {doctor} on {date} has been completed."),
            MessageType::Success,
        ),
        AppointmentStatus::Cancelled => NotificationMessage::new(
            "Appointment Cancelled",
            format!(
                "Your appointment on {date} at {time} was cancelled. Reason: {}",
                or(&data.cancellation_reason, "not specified")
            ),
            MessageType::Warning,
        ),
    }
}

/// Generic message used when the status string is not recognised.
pub fn fallback_message() -> NotificationMessage {
    NotificationMessage::new(
        "Appointment Status Updated",
        "The status of your appointment has been updated.".to_string(),
        MessageType::Info,
    )
}

/// Like [`notification_message`] but for a raw status string.
pub fn notification_message_for(status: &str, data: &MessageData) -> NotificationMessage {
    match status.parse::<AppointmentStatus>() {
        Ok(status) => notification_message(status, data),
        Err(_) => fallback_message(),
    }
}

/// Notification sent to a doctor when an appointment is assigned to them.
pub fn doctor_assignment_message(patient_name: &str, data: &MessageData) -> NotificationMessage {
    NotificationMessage::new(
        "New Appointment Assigned",
        format!(
            "You have been assigned an appointment with {patient_name} on {} at {}.",
            or(&data.date, "the requested date"),
            or(&data.time, "the requested time")
        ),
        MessageType::Info,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> MessageData {
        MessageData {
            doctor_name: Some("Ayşe Demir".into()),
            date: Some("2025-11-03".into()),
            time: Some("10:30".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_rejection_reason_is_verbatim() {
        let reason = "Please visit the emergency unit instead; bring your ID <card>.";
        let msg = notification_message(
            AppointmentStatus::Rejected,
            &MessageData {
                rejection_reason: Some(reason.into()),
                ..data()
            },
        );
        assert!(msg.message.contains(reason));
        assert_eq!(msg.kind, MessageType::Error);
    }

    #[test]
    fn test_confirmed_interpolates_doctor_and_slot() {
        let msg = notification_message(AppointmentStatus::Confirmed, &data());
        assert_eq!(msg.title, "Appointment Confirmed");
        assert!(msg.message.contains("Dr. Ayşe Demir"));
        assert!(msg.message.contains("2025-11-03 at 10:30"));
    }

    #[test]
    fn test_cancel_reason_and_reschedule_slot() {
        let cancelled = notification_message(
            AppointmentStatus::Cancelled,
            &MessageData {
                cancellation_reason: Some("Doctor on leave".into()),
                ..data()
            },
        );
        assert!(cancelled.message.ends_with("Reason: Doctor on leave"));

        let rescheduled = notification_message(
            AppointmentStatus::Rescheduled,
            &MessageData {
                new_date: Some("2025-11-05".into()),
                new_time: Some("14:00".into()),
                ..data()
            },
        );
        assert!(rescheduled.message.contains("2025-11-05 at 14:00"));
    }

    #[test]
    fn test_missing_doctor_name_has_no_title_prefix() {
        let anonymous = MessageData {
            doctor_name: None,
            ..data()
        };
        for status in AppointmentStatus::ALL {
            let msg = notification_message(status, &anonymous);
            assert!(!msg.message.contains("Dr."), "{status}: {}", msg.message);
        }

        let assigned = notification_message(AppointmentStatus::Assigned, &anonymous);
        assert!(assigned.message.starts_with("Your doctor has been assigned"));
        let confirmed = notification_message(AppointmentStatus::Confirmed, &anonymous);
        assert!(confirmed.message.contains("with your doctor on 2025-11-03"));

        let named = notification_message(AppointmentStatus::Assigned, &data());
        assert!(named.message.starts_with("Dr. Ayşe Demir has been assigned"));
    }

    #[test]
    fn test_every_status_has_a_message() {
        for status in AppointmentStatus::ALL {
            let msg = notification_message(status, &MessageData::default());
            assert!(!msg.title.is_empty());
            assert_ne!(msg, fallback_message());
        }
    }

    #[test]
    fn test_unknown_status_falls_back() {
        let msg = notification_message_for("archived", &data());
        assert_eq!(msg.title, "Appointment Status Updated");
        let known = notification_message_for("completed", &data());
        assert_eq!(known.title, "Appointment Completed");
    }

    #[test]
    fn test_type_serializes_as_type() {
        let json = serde_json::to_value(fallback_message()).unwrap();
        assert_eq!(json["type"], "info");
    }
}
