//! Typed job payload definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Typed payloads for known job types.
///
/// The `job_type` tag doubles as the handler name in the worker registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "job_type")]
pub enum JobPayload {
    /// Deliver one notification through its channel.
    #[serde(rename = "notification_delivery")]
    NotificationDelivery {
        /// Notification to deliver.
        notification_id: Uuid,
    },
    /// Sync the academic calendar for a year (current year when `None`).
    #[serde(rename = "calendar_sync")]
    CalendarSync {
        /// Target year.
        year: Option<i32>,
    },
    /// Prune old read notifications.
    #[serde(rename = "notification_cleanup")]
    NotificationCleanup,
}

impl JobPayload {
    /// The job type string for this payload.
    pub fn job_type(&self) -> &'static str {
        match self {
            Self::NotificationDelivery { .. } => "notification_delivery",
            Self::CalendarSync { .. } => "calendar_sync",
            Self::NotificationCleanup => "notification_cleanup",
        }
    }

    /// Queue this payload belongs on.
    pub fn queue(&self) -> &'static str {
        match self {
            Self::NotificationDelivery { .. } => "notifications",
            Self::CalendarSync { .. } | Self::NotificationCleanup => "maintenance",
        }
    }
}
