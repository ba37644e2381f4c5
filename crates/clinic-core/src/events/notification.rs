//! Notification-related domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to in-app notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NotificationEvent {
    /// An in-app notification was delivered to a user.
    Delivered {
        /// The notification ID.
        notification_id: Uuid,
        /// The recipient.
        user_id: Uuid,
        /// Notification title.
        title: String,
        /// Notification body.
        message: String,
        /// Display style (`info`, `success`, `warning`, `error`).
        kind: String,
    },
}
