//! Notification category enumeration.

use serde::{Deserialize, Serialize};

/// Category of a notification for filtering in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Appointment workflow updates.
    Appointment,
    /// Account events (verification, activation).
    Account,
    /// Medical record updates.
    MedicalRecord,
    /// System announcements.
    System,
}

impl NotificationCategory {
    /// Return the category as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appointment => "appointment",
            Self::Account => "account",
            Self::MedicalRecord => "medical_record",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
