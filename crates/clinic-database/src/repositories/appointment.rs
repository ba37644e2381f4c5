//! Appointment repository implementation.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use clinic_core::error::{AppError, ErrorKind};
use clinic_core::result::AppResult;
use clinic_core::types::pagination::{PageRequest, PageResponse};
use clinic_entity::appointment::{Appointment, AppointmentStatus, CreateAppointment, StatusChange};

/// Optional filters for listing appointments.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    /// Only this patient's appointments.
    pub patient_id: Option<Uuid>,
    /// Only this doctor's appointments.
    pub doctor_id: Option<Uuid>,
    /// Only appointments in this status.
    pub status: Option<AppointmentStatus>,
    /// Earliest appointment date (inclusive).
    pub date_from: Option<NaiveDate>,
    /// Latest appointment date (inclusive).
    pub date_to: Option<NaiveDate>,
}

const FILTER_CLAUSE: &str = "($1::uuid IS NULL OR patient_id = $1) \
     AND ($2::uuid IS NULL OR doctor_id = $2) \
     AND ($3::appointment_status IS NULL OR status = $3) \
     AND ($4::date IS NULL OR appointment_date >= $4) \
     AND ($5::date IS NULL OR appointment_date <= $5)";

/// Repository for appointments and their status changes.
#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    /// Create a new appointment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an appointment by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find appointment", e)
            })
    }

    /// List appointments matching `filter`, most urgent and soonest first.
    pub async fn find_all(
        &self,
        filter: &AppointmentFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Appointment>> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM appointments WHERE {FILTER_CLAUSE}"
        ))
        .bind(filter.patient_id)
        .bind(filter.doctor_id)
        .bind(filter.status)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count appointments", e))?;

        let items = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT * FROM appointments WHERE {FILTER_CLAUSE} \
             ORDER BY priority DESC, appointment_date ASC, appointment_time ASC \
             LIMIT $6 OFFSET $7"
        ))
        .bind(filter.patient_id)
        .bind(filter.doctor_id)
        .bind(filter.status)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list appointments", e))?;

        Ok(PageResponse::new(items, *page, total as u64))
    }

    /// Insert a new appointment in `pending`.
    pub async fn create(&self, data: &CreateAppointment) -> AppResult<Appointment> {
        sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (patient_id, appointment_date, appointment_time, priority, \
             appointment_type, reason) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.patient_id)
        .bind(data.appointment_date)
        .bind(data.appointment_time)
        .bind(data.priority)
        .bind(data.appointment_type)
        .bind(&data.reason)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create appointment", e))
    }

    /// Persist a status change.
    ///
    /// The update only applies while the row is still in
    /// `change.from_status`; `None` means another request got there first.
    /// The `*_at` column matching the target status is stamped.
    pub async fn apply_status_change(
        &self,
        id: Uuid,
        change: &StatusChange,
    ) -> AppResult<Option<Appointment>> {
        sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET \
                status = $2, \
                doctor_id = COALESCE($4, doctor_id), \
                appointment_date = COALESCE($6, appointment_date), \
                appointment_time = COALESCE($7, appointment_time), \
                notes = COALESCE($8, notes), \
                rejection_reason = CASE WHEN $2 = 'rejected' THEN $5 ELSE rejection_reason END, \
                cancellation_reason = CASE WHEN $2 = 'cancelled' THEN $5 ELSE cancellation_reason END, \
                reviewed_by = CASE WHEN $2 = 'under_review' THEN $3 ELSE reviewed_by END, \
                reviewed_at = CASE WHEN $2 = 'under_review' THEN NOW() ELSE reviewed_at END, \
                assigned_by = CASE WHEN $2 = 'assigned' THEN $3 ELSE assigned_by END, \
                assigned_at = CASE WHEN $2 = 'assigned' THEN NOW() ELSE assigned_at END, \
                confirmed_at = CASE WHEN $2 = 'confirmed' THEN NOW() ELSE confirmed_at END, \
                rescheduled_at = CASE WHEN $2 = 'rescheduled' THEN NOW() ELSE rescheduled_at END, \
                completed_at = CASE WHEN $2 = 'completed' THEN NOW() ELSE completed_at END, \
                cancelled_at = CASE WHEN $2 = 'cancelled' THEN NOW() ELSE cancelled_at END, \
                rejected_at = CASE WHEN $2 = 'rejected' THEN NOW() ELSE rejected_at END, \
                updated_at = NOW() \
             WHERE id = $1 AND status = $9 \
             RETURNING *",
        )
        .bind(id)
        .bind(change.to_status)
        .bind(change.actor_id)
        .bind(change.doctor_id)
        .bind(&change.reason)
        .bind(change.new_date)
        .bind(change.new_time)
        .bind(&change.notes)
        .bind(change.from_status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update appointment status", e)
        })
    }

    /// Count appointments per status, optionally scoped to a patient or doctor.
    pub async fn count_by_status(
        &self,
        patient_id: Option<Uuid>,
        doctor_id: Option<Uuid>,
    ) -> AppResult<Vec<(AppointmentStatus, i64)>> {
        sqlx::query_as::<_, (AppointmentStatus, i64)>(
            "SELECT status, COUNT(*) FROM appointments \
             WHERE ($1::uuid IS NULL OR patient_id = $1) AND ($2::uuid IS NULL OR doctor_id = $2) \
             GROUP BY status ORDER BY status",
        )
        .bind(patient_id)
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count appointments", e))
    }

    /// Number of non-terminal appointments a patient currently has.
    pub async fn count_open_for_patient(&self, patient_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments WHERE patient_id = $1 \
             AND status NOT IN ('rejected', 'completed', 'cancelled')",
        )
        .bind(patient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count appointments", e))
    }
}
