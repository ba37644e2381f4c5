//! Appointment-related domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to the appointment workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AppointmentEvent {
    /// A patient requested a new appointment.
    Created {
        /// The appointment ID.
        appointment_id: Uuid,
        /// The requesting patient.
        patient_id: Uuid,
    },
    /// An appointment moved to a new status (or was reassigned).
    StatusChanged {
        /// The appointment ID.
        appointment_id: Uuid,
        /// The patient the appointment belongs to.
        patient_id: Uuid,
        /// The assigned doctor, if any.
        doctor_id: Option<Uuid>,
        /// The action that was performed.
        action: String,
        /// Status before the action.
        from_status: String,
        /// Status after the action.
        to_status: String,
    },
}
