//! Notification delivery configuration.

use serde::{Deserialize, Serialize};

/// Controls which channels status-change notifications are sent through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Delivery methods used for each notification: `email`, `sms`, `push`, `in_app`.
    #[serde(default = "default_methods")]
    pub delivery_methods: Vec<String>,
    /// Sender address for outgoing email.
    #[serde(default = "default_mail_from")]
    pub mail_from: String,
    /// Read notifications older than this are pruned.
    #[serde(default = "default_retention")]
    pub retention_days: i64,
    /// Maximum delivery attempts per notification.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            delivery_methods: default_methods(),
            mail_from: default_mail_from(),
            retention_days: default_retention(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_methods() -> Vec<String> {
    vec!["in_app".to_string(), "email".to_string()]
}

fn default_mail_from() -> String {
    "clinic@university.edu.tr".to_string()
}

fn default_retention() -> i64 {
    90
}

fn default_max_attempts() -> i32 {
    3
}
