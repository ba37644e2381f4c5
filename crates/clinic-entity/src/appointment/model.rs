//! Appointment entity model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::action::AvailableAction;
use super::kind::AppointmentType;
use super::priority::AppointmentPriority;
use super::status::AppointmentStatus;
use crate::user::UserSummary;

/// An appointment request and its progress through the workflow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    /// Unique appointment identifier.
    pub id: Uuid,
    /// The patient who requested the appointment.
    pub patient_id: Uuid,
    /// The assigned doctor (set on assignment).
    pub doctor_id: Option<Uuid>,
    /// Appointment date.
    pub appointment_date: NaiveDate,
    /// Appointment start time.
    pub appointment_time: NaiveTime,
    /// Current workflow status.
    pub status: AppointmentStatus,
    /// Triage priority.
    pub priority: AppointmentPriority,
    /// Kind of visit.
    pub appointment_type: AppointmentType,
    /// Patient's reason for the visit.
    pub reason: String,
    /// Free-text staff notes.
    pub notes: Option<String>,
    /// Reason given when rejected.
    pub rejection_reason: Option<String>,
    /// Reason given when cancelled.
    pub cancellation_reason: Option<String>,
    /// Staff member who started the review.
    pub reviewed_by: Option<Uuid>,
    /// Staff member who assigned the doctor.
    pub assigned_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub rescheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the appointment was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Whether `user_id` is the patient on this appointment.
    pub fn belongs_to(&self, user_id: Uuid) -> bool {
        self.patient_id == user_id
    }

    /// Whether `user_id` is the assigned doctor.
    pub fn is_assigned_to(&self, user_id: Uuid) -> bool {
        self.doctor_id == Some(user_id)
    }
}

/// Data required to create a new appointment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointment {
    /// Requesting patient.
    pub patient_id: Uuid,
    /// Requested date.
    pub appointment_date: NaiveDate,
    /// Requested time.
    pub appointment_time: NaiveTime,
    /// Priority.
    pub priority: AppointmentPriority,
    /// Kind of visit.
    pub appointment_type: AppointmentType,
    /// Reason for the visit.
    pub reason: String,
}

/// A validated status change ready to be persisted.
///
/// Only the fields relevant to the action are set; the repository stamps
/// the matching `*_at` column from `to_status`.
#[derive(Debug, Clone)]
pub struct StatusChange {
    /// Status the row must still be in.
    pub from_status: AppointmentStatus,
    /// New status.
    pub to_status: AppointmentStatus,
    /// Acting user.
    pub actor_id: Uuid,
    /// New doctor (assign/reassign).
    pub doctor_id: Option<Uuid>,
    /// Rejection or cancellation reason.
    pub reason: Option<String>,
    /// New slot (reschedule).
    pub new_date: Option<NaiveDate>,
    pub new_time: Option<NaiveTime>,
    /// Staff notes appended to the appointment.
    pub notes: Option<String>,
}

/// Appointment enriched for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentDetail {
    /// The appointment.
    #[serde(flatten)]
    pub appointment: Appointment,
    /// Patient summary.
    pub patient: Option<UserSummary>,
    /// Doctor summary.
    pub doctor: Option<UserSummary>,
    /// Actions the viewing user may take.
    pub available_actions: Vec<AvailableAction>,
}
