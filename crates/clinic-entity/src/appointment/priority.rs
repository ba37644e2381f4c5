//! Appointment priority enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Triage priority of an appointment request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "appointment_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl AppointmentPriority {
    /// Return the priority as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl Default for AppointmentPriority {
    fn default() -> Self {
        Self::Normal
    }
}

impl fmt::Display for AppointmentPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppointmentPriority {
    type Err = clinic_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(clinic_core::AppError::invalid_field(
                "priority",
                format!("Invalid priority: '{s}'. Expected urgent, high, normal or low"),
            )),
        }
    }
}
