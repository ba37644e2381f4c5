//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::category::NotificationCategory;
use super::method::DeliveryMethod;
use super::status::NotificationStatus;

/// A notification to be delivered to a user through one channel.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub user_id: Uuid,
    /// Notification category.
    pub category: NotificationCategory,
    /// Channel used for delivery.
    pub delivery_method: DeliveryMethod,
    /// Delivery status.
    pub status: NotificationStatus,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Additional structured data (JSON).
    pub payload: serde_json::Value,
    /// Last delivery error, if any.
    pub error: Option<String>,
    /// When the notification was delivered.
    pub sent_at: Option<DateTime<Utc>>,
    /// When the notification was read.
    pub read_at: Option<DateTime<Utc>>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        self.status != NotificationStatus::Read
    }
}

/// Data required to create a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    pub user_id: Uuid,
    pub category: NotificationCategory,
    pub delivery_method: DeliveryMethod,
    pub title: String,
    pub message: String,
    pub payload: serde_json::Value,
}
