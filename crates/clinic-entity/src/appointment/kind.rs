//! Appointment type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of visit requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "appointment_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    /// General examination.
    General,
    /// Follow-up to an earlier visit.
    FollowUp,
    /// Consultation with a specialist.
    Consultation,
    /// Same-day urgent care.
    Emergency,
    /// Vaccination appointment.
    Vaccination,
}

impl AppointmentType {
    /// Return the type as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::FollowUp => "follow_up",
            Self::Consultation => "consultation",
            Self::Emergency => "emergency",
            Self::Vaccination => "vaccination",
        }
    }
}

impl Default for AppointmentType {
    fn default() -> Self {
        Self::General
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
