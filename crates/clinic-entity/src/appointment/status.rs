//! Appointment status enumeration and the transition table.
//!
//! This table is the only copy of the workflow rules. The API publishes it
//! so frontends never carry their own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use clinic_core::AppError;
use clinic_core::error::codes;

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Requested by a patient, not yet looked at.
    Pending,
    /// Clinical staff are triaging the request.
    UnderReview,
    /// A doctor has been assigned.
    Assigned,
    /// Declined by clinical staff during review.
    Rejected,
    /// The doctor confirmed the slot.
    Confirmed,
    /// The doctor proposed a different slot.
    Rescheduled,
    /// The visit took place.
    Completed,
    /// Called off after confirmation.
    Cancelled,
}

impl AppointmentStatus {
    /// Every status, in workflow order.
    pub const ALL: [AppointmentStatus; 8] = [
        Self::Pending,
        Self::UnderReview,
        Self::Assigned,
        Self::Rejected,
        Self::Confirmed,
        Self::Rescheduled,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Statuses reachable from this one.
    pub fn allowed_transitions(&self) -> &'static [AppointmentStatus] {
        use AppointmentStatus::*;
        match self {
            Pending => &[UnderReview],
            UnderReview => &[Assigned, Rejected],
            Assigned => &[Confirmed, Rescheduled, Rejected],
            Confirmed => &[Completed, Cancelled],
            Rescheduled => &[Confirmed, Cancelled],
            Rejected | Completed | Cancelled => &[],
        }
    }

    /// Whether `next` is in this status's allowed list.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Terminal statuses have no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Statuses that still occupy a slot in the clinic's schedule.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::UnderReview => "under_review",
            Self::Assigned => "assigned",
            Self::Rejected => "rejected",
            Self::Confirmed => "confirmed",
            Self::Rescheduled => "rescheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::UnderReview => "Under Review",
            Self::Assigned => "Assigned",
            Self::Rejected => "Rejected",
            Self::Confirmed => "Confirmed",
            Self::Rescheduled => "Rescheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Validate a transition at the point of mutation.
    pub fn ensure_transition(&self, next: AppointmentStatus) -> Result<(), AppError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Appointment cannot move from '{self}' to '{next}'"
            ))
            .with_code(codes::INVALID_STATUS_TRANSITION))
        }
    }
}

/// Free-function form of [`AppointmentStatus::can_transition_to`].
pub fn can_transition_to(current: AppointmentStatus, next: AppointmentStatus) -> bool {
    current.can_transition_to(next)
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.to_lowercase())
            .ok_or_else(|| {
                AppError::invalid_field("status", format!("Invalid appointment status: '{s}'"))
            })
    }
}

/// Serializable view of the whole table, one row per status.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionRow {
    /// Source status.
    pub from: AppointmentStatus,
    /// Display label of the source status.
    pub label: &'static str,
    /// Reachable statuses.
    pub to: Vec<AppointmentStatus>,
    /// Whether the source status is terminal.
    pub terminal: bool,
}

/// The full transition table.
pub fn transition_table() -> Vec<TransitionRow> {
    AppointmentStatus::ALL
        .into_iter()
        .map(|from| TransitionRow {
            from,
            label: from.label(),
            to: from.allowed_transitions().to_vec(),
            terminal: from.is_terminal(),
        })
        .collect()
}
