//! Medical record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Clinical notes written by the doctor after a completed appointment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MedicalRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// The appointment this record documents (one record per appointment).
    pub appointment_id: Uuid,
    /// The patient.
    pub patient_id: Uuid,
    /// The authoring doctor.
    pub doctor_id: Uuid,
    /// Diagnosis.
    pub diagnosis: String,
    /// Treatment given or recommended.
    pub treatment: Option<String>,
    /// Prescribed medication.
    pub prescription: Option<String>,
    /// Additional notes.
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a medical record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMedicalRecord {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub diagnosis: String,
    pub treatment: Option<String>,
    pub prescription: Option<String>,
    pub notes: Option<String>,
}
