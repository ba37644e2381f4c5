//! Setting entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A key/value runtime setting editable by administrators.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    /// Dotted setting key.
    pub key: String,
    /// JSON value.
    pub value: serde_json::Value,
    /// What the setting controls.
    pub description: Option<String>,
    /// Last administrator to change it.
    pub updated_by: Option<Uuid>,
    /// When it was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Well-known setting keys.
pub mod keys {
    /// Reject bookings on dates covered by a blocking holiday.
    pub const BLOCK_ON_HOLIDAYS: &str = "appointments.block_on_holidays";
    /// Maximum open (non-terminal) appointments per patient.
    pub const MAX_PENDING_PER_PATIENT: &str = "appointments.max_pending_per_patient";
}
