//! Medical record creation and access rules.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use clinic_core::error::{AppError, codes};
use clinic_database::repositories::{AppointmentRepository, MedicalRecordRepository};
use clinic_entity::appointment::{
    Appointment, AppointmentStatus, MessageType, NotificationMessage,
};
use clinic_entity::medical_record::{CreateMedicalRecord, MedicalRecord};
use clinic_entity::notification::NotificationCategory;
use clinic_entity::user::UserRole;

use crate::context::RequestContext;
use crate::notification::{NotificationDispatcher, OutgoingNotification};

/// Clinical findings for one appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMedicalRecordRequest {
    pub diagnosis: String,
    pub treatment: Option<String>,
    pub prescription: Option<String>,
    pub notes: Option<String>,
}

/// Writes and reads medical records.
#[derive(Debug, Clone)]
pub struct MedicalRecordService {
    record_repo: Arc<MedicalRecordRepository>,
    appointment_repo: Arc<AppointmentRepository>,
    dispatcher: Arc<NotificationDispatcher>,
}

/// Roles that may read any patient's records.
fn reads_any(role: UserRole) -> bool {
    matches!(
        role,
        UserRole::Doctor | UserRole::ClinicalStaff | UserRole::Admin | UserRole::Superadmin
    )
}

/// A record is written once, by the assigned doctor, after the visit.
///
/// The unique index on `appointment_id` still rejects a concurrent second
/// insert.
fn ensure_writable(
    ctx: &RequestContext,
    appointment: &Appointment,
    already_recorded: bool,
) -> Result<(), AppError> {
    ctx.require_role(&[UserRole::Doctor])?;
    if !appointment.is_assigned_to(ctx.user_id) {
        return Err(AppError::forbidden(
            codes::NOT_ASSIGNED_DOCTOR,
            "This appointment is not assigned to you",
        ));
    }
    if appointment.status != AppointmentStatus::Completed {
        return Err(AppError::validation(format!(
            "Medical records can only be written for completed appointments (current status: {})",
            appointment.status
        )));
    }
    if already_recorded {
        return Err(AppError::conflict(
            "A medical record already exists for this appointment",
        ));
    }
    Ok(())
}

impl MedicalRecordService {
    /// Creates a new medical record service.
    pub fn new(
        record_repo: Arc<MedicalRecordRepository>,
        appointment_repo: Arc<AppointmentRepository>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            record_repo,
            appointment_repo,
            dispatcher,
        }
    }

    /// Record the outcome of a completed appointment. Only its doctor may
    /// write it, and only once.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        appointment_id: Uuid,
        req: CreateMedicalRecordRequest,
    ) -> Result<MedicalRecord, AppError> {
        ctx.require_role(&[UserRole::Doctor])?;

        let appointment = self
            .appointment_repo
            .find_by_id(appointment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Appointment {appointment_id} not found")))?;

        let already_recorded = self
            .record_repo
            .exists_for_appointment(appointment_id)
            .await?;
        ensure_writable(ctx, &appointment, already_recorded)?;

        let diagnosis = req.diagnosis.trim();
        if diagnosis.is_empty() {
            return Err(AppError::invalid_field("diagnosis", "A diagnosis is required"));
        }

        let record = self
            .record_repo
            .create(&CreateMedicalRecord {
                appointment_id,
                patient_id: appointment.patient_id,
                doctor_id: ctx.user_id,
                diagnosis: diagnosis.to_string(),
                treatment: req.treatment,
                prescription: req.prescription,
                notes: req.notes,
            })
            .await?;

        info!(record_id = %record.id, appointment_id = %appointment_id, "Medical record created");

        let outgoing = OutgoingNotification {
            user_id: appointment.patient_id,
            category: NotificationCategory::MedicalRecord,
            message: NotificationMessage {
                title: "Medical Record Available".to_string(),
                message: format!(
                    "A medical record for your appointment on {} is now available.",
                    appointment.appointment_date.format("%Y-%m-%d")
                ),
                kind: MessageType::Info,
            },
            context: json!({ "appointment_id": appointment_id, "record_id": record.id }),
        };
        if let Err(e) = self.dispatcher.dispatch(&outgoing).await {
            warn!(record_id = %record.id, error = %e, "Failed to queue record notification");
        }

        Ok(record)
    }

    /// The caller's own records.
    pub async fn list_own(&self, ctx: &RequestContext) -> Result<Vec<MedicalRecord>, AppError> {
        self.record_repo.find_by_patient(ctx.user_id).await
    }

    /// Records of `patient_id`; patients may only read their own.
    pub async fn list_for_patient(
        &self,
        ctx: &RequestContext,
        patient_id: Uuid,
    ) -> Result<Vec<MedicalRecord>, AppError> {
        if !reads_any(ctx.role) && ctx.user_id != patient_id {
            return Err(AppError::forbidden(
                codes::NOT_RESOURCE_OWNER,
                "You can only view your own medical records",
            ));
        }
        self.record_repo.find_by_patient(patient_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use clinic_core::error::ErrorKind;
    use clinic_entity::appointment::{AppointmentPriority, AppointmentType};

    fn appointment(status: AppointmentStatus, doctor_id: Uuid) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Some(doctor_id),
            appointment_date: NaiveDate::from_ymd_opt(2025, 11, 10).unwrap(),
            appointment_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            status,
            priority: AppointmentPriority::Normal,
            appointment_type: AppointmentType::General,
            reason: "Persistent cough".into(),
            notes: None,
            rejection_reason: None,
            cancellation_reason: None,
            reviewed_by: None,
            assigned_by: None,
            reviewed_at: None,
            assigned_at: None,
            confirmed_at: None,
            rescheduled_at: None,
            completed_at: None,
            cancelled_at: None,
            rejected_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn doctor(id: Uuid) -> RequestContext {
        RequestContext::new(id, UserRole::Doctor, "dr@uni.edu.tr".into())
    }

    #[test]
    fn test_assigned_doctor_writes_completed_visit() {
        let id = Uuid::new_v4();
        let appt = appointment(AppointmentStatus::Completed, id);
        assert!(ensure_writable(&doctor(id), &appt, false).is_ok());
    }

    #[test]
    fn test_only_doctors_write_records() {
        let id = Uuid::new_v4();
        let appt = appointment(AppointmentStatus::Completed, id);
        let staff = RequestContext::new(id, UserRole::ClinicalStaff, "c@uni.edu.tr".into());
        let err = ensure_writable(&staff, &appt, false).unwrap_err();
        assert_eq!(err.error_code(), codes::INSUFFICIENT_PERMISSIONS);

        let other = ensure_writable(&doctor(Uuid::new_v4()), &appt, false).unwrap_err();
        assert_eq!(other.error_code(), codes::NOT_ASSIGNED_DOCTOR);
    }

    #[test]
    fn test_record_needs_completed_visit() {
        let id = Uuid::new_v4();
        for status in [AppointmentStatus::Assigned, AppointmentStatus::Confirmed] {
            let err = ensure_writable(&doctor(id), &appointment(status, id), false).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }
    }

    #[test]
    fn test_one_record_per_appointment() {
        let id = Uuid::new_v4();
        let appt = appointment(AppointmentStatus::Completed, id);
        let err = ensure_writable(&doctor(id), &appt, true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[test]
    fn test_reads_any() {
        assert!(reads_any(UserRole::Doctor));
        assert!(reads_any(UserRole::Admin));
        assert!(!reads_any(UserRole::Student));
        assert!(!reads_any(UserRole::AcademicStaff));
    }
}
