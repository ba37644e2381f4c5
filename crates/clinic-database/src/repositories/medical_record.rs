//! Medical record repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use clinic_core::error::{AppError, ErrorKind};
use clinic_core::result::AppResult;
use clinic_entity::medical_record::{CreateMedicalRecord, MedicalRecord};

use super::map_insert_error;

/// Repository for medical records.
#[derive(Debug, Clone)]
pub struct MedicalRecordRepository {
    pool: PgPool,
}

impl MedicalRecordRepository {
    /// Create a new medical record repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All records for a patient, newest first.
    pub async fn find_by_patient(&self, patient_id: Uuid) -> AppResult<Vec<MedicalRecord>> {
        sqlx::query_as::<_, MedicalRecord>(
            "SELECT * FROM medical_records WHERE patient_id = $1 ORDER BY created_at DESC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list medical records", e))
    }

    /// Whether `appointment_id` already has a record.
    pub async fn exists_for_appointment(&self, appointment_id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM medical_records WHERE appointment_id = $1)",
        )
        .bind(appointment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check medical record", e))
    }

    /// Insert a record. A second record for the same appointment is a conflict.
    pub async fn create(&self, data: &CreateMedicalRecord) -> AppResult<MedicalRecord> {
        sqlx::query_as::<_, MedicalRecord>(
            "INSERT INTO medical_records (appointment_id, patient_id, doctor_id, diagnosis, \
             treatment, prescription, notes) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.appointment_id)
        .bind(data.patient_id)
        .bind(data.doctor_id)
        .bind(&data.diagnosis)
        .bind(&data.treatment)
        .bind(&data.prescription)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_insert_error(
                e,
                "medical record",
                "A medical record already exists for this appointment",
            )
        })
    }
}
