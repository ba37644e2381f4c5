//! Pure helpers for performing a workflow action.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use clinic_core::error::{AppError, codes};
use clinic_entity::appointment::{
    Appointment, AppointmentAction, AppointmentStatus, MessageData, StatusChange,
};
use clinic_entity::user::UserRole;

use crate::context::RequestContext;

/// Inputs an action may need, posted alongside it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionInput {
    /// Doctor to assign (assign, reassign).
    pub doctor_id: Option<Uuid>,
    /// Free-text reason (reject, cancel).
    pub reason: Option<String>,
    /// Proposed date (reschedule).
    pub new_date: Option<NaiveDate>,
    /// Proposed time (reschedule).
    pub new_time: Option<NaiveTime>,
    /// Optional note stored on the appointment.
    pub notes: Option<String>,
}

/// The value as given, unless it is only whitespace.
fn non_blank(value: &Option<String>) -> Option<String> {
    value.clone().filter(|s| !s.trim().is_empty())
}

/// Check that `input` carries what `action` needs.
///
/// All missing fields are reported together under their names.
pub fn validate_input(
    action: AppointmentAction,
    input: &ActionInput,
    today: NaiveDate,
) -> Result<(), AppError> {
    let mut errors = Map::new();
    let mut add = |field: &str, message: String| {
        errors.insert(field.to_string(), json!([message]));
    };

    if action.requires_doctor() && input.doctor_id.is_none() {
        add("doctor_id", format!("A doctor is required to {action}"));
    }
    if action.requires_reason() && non_blank(&input.reason).is_none() {
        add("reason", format!("A reason is required to {action}"));
    }
    if action.requires_new_slot() {
        match input.new_date {
            None => add("new_date", "A new date is required to reschedule".to_string()),
            Some(date) if date < today => {
                add("new_date", "The new date cannot be in the past".to_string())
            }
            Some(_) => {}
        }
        if input.new_time.is_none() {
            add("new_time", "A new time is required to reschedule".to_string());
        }
    }

    if errors.is_empty() {
        return Ok(());
    }
    let first = errors
        .values()
        .next()
        .and_then(|v| v[0].as_str())
        .unwrap_or("Invalid action input")
        .to_string();
    Err(AppError::validation(first).with_details(Value::Object(errors)))
}

/// Doctors may only act on appointments assigned to them.
pub fn ensure_assigned_doctor(ctx: &RequestContext, appointment: &Appointment) -> Result<(), AppError> {
    if ctx.role == UserRole::Doctor && !appointment.is_assigned_to(ctx.user_id) {
        return Err(AppError::forbidden(
            codes::NOT_ASSIGNED_DOCTOR,
            "This appointment is not assigned to you",
        ));
    }
    Ok(())
}

/// Whether the caller may read `appointment`.
pub fn can_view(ctx: &RequestContext, appointment: &Appointment) -> bool {
    match ctx.role {
        UserRole::Student | UserRole::AcademicStaff => appointment.belongs_to(ctx.user_id),
        UserRole::Doctor => appointment.is_assigned_to(ctx.user_id),
        UserRole::ClinicalStaff | UserRole::Admin | UserRole::Superadmin => true,
    }
}

/// The row update for `action` taken by `actor_id`.
pub fn status_change(
    appointment: &Appointment,
    action: AppointmentAction,
    next: AppointmentStatus,
    actor_id: Uuid,
    input: &ActionInput,
) -> StatusChange {
    StatusChange {
        from_status: appointment.status,
        to_status: next,
        actor_id,
        doctor_id: input.doctor_id.filter(|_| action.requires_doctor()),
        reason: non_blank(&input.reason).filter(|_| action.requires_reason()),
        new_date: input.new_date.filter(|_| action.requires_new_slot()),
        new_time: input.new_time.filter(|_| action.requires_new_slot()),
        notes: non_blank(&input.notes),
    }
}

/// Interpolation values for the patient and doctor messages, taken from
/// the appointment as it was before the change.
pub fn message_data(
    before: &Appointment,
    change: &StatusChange,
    doctor_name: Option<String>,
) -> MessageData {
    MessageData {
        doctor_name,
        date: Some(before.appointment_date.format("%Y-%m-%d").to_string()),
        time: Some(before.appointment_time.format("%H:%M").to_string()),
        new_date: change.new_date.map(|d| d.format("%Y-%m-%d").to_string()),
        new_time: change.new_time.map(|t| t.format("%H:%M").to_string()),
        rejection_reason: change
            .reason
            .clone()
            .filter(|_| change.to_status == AppointmentStatus::Rejected),
        cancellation_reason: change
            .reason
            .clone()
            .filter(|_| change.to_status == AppointmentStatus::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use clinic_entity::appointment::{AppointmentPriority, AppointmentType};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
    }

    fn appointment(status: AppointmentStatus, doctor_id: Option<Uuid>) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id,
            appointment_date: NaiveDate::from_ymd_opt(2025, 11, 10).unwrap(),
            appointment_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            status,
            priority: AppointmentPriority::Normal,
            appointment_type: AppointmentType::General,
            reason: "Sore throat".into(),
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

    #[test]
    fn test_assign_requires_doctor() {
        let err = validate_input(AppointmentAction::Assign, &ActionInput::default(), today())
            .unwrap_err();
        assert_eq!(err.kind.status_code().as_u16(), 422);
        assert!(err.details.unwrap().get("doctor_id").is_some());
    }

    #[test]
    fn test_blank_reason_rejected() {
        let input = ActionInput {
            reason: Some("   ".into()),
            ..Default::default()
        };
        assert!(validate_input(AppointmentAction::Reject, &input, today()).is_err());
        assert!(validate_input(AppointmentAction::StartReview, &input, today()).is_ok());
    }

    #[test]
    fn test_reschedule_reports_both_fields() {
        let input = ActionInput {
            new_date: NaiveDate::from_ymd_opt(2025, 11, 1),
            ..Default::default()
        };
        let details = validate_input(AppointmentAction::Reschedule, &input, today())
            .unwrap_err()
            .details
            .unwrap();
        assert!(details.get("new_date").is_some());
        assert!(details.get("new_time").is_some());
    }

    #[test]
    fn test_doctor_must_be_assigned() {
        let doctor = Uuid::new_v4();
        let ctx = RequestContext::new(doctor, UserRole::Doctor, "dr@uni.edu.tr".into());

        let mine = appointment(AppointmentStatus::Assigned, Some(doctor));
        assert!(ensure_assigned_doctor(&ctx, &mine).is_ok());

        let other = appointment(AppointmentStatus::Assigned, Some(Uuid::new_v4()));
        let err = ensure_assigned_doctor(&ctx, &other).unwrap_err();
        assert_eq!(err.error_code(), codes::NOT_ASSIGNED_DOCTOR);
    }

    #[test]
    fn test_visibility_by_role() {
        let appt = appointment(AppointmentStatus::Pending, None);
        let owner = RequestContext::new(appt.patient_id, UserRole::Student, "s@uni.edu.tr".into());
        let stranger = RequestContext::new(Uuid::new_v4(), UserRole::Student, "x@uni.edu.tr".into());
        let staff = RequestContext::new(Uuid::new_v4(), UserRole::ClinicalStaff, "c@uni.edu.tr".into());
        let doctor = RequestContext::new(Uuid::new_v4(), UserRole::Doctor, "d@uni.edu.tr".into());

        assert!(can_view(&owner, &appt));
        assert!(!can_view(&stranger, &appt));
        assert!(can_view(&staff, &appt));
        assert!(!can_view(&doctor, &appt));
    }

    #[test]
    fn test_status_change_keeps_only_relevant_inputs() {
        let appt = appointment(AppointmentStatus::Assigned, Some(Uuid::new_v4()));
        let input = ActionInput {
            doctor_id: Some(Uuid::new_v4()),
            reason: Some("Doctor unavailable".into()),
            new_date: NaiveDate::from_ymd_opt(2025, 11, 12),
            new_time: NaiveTime::from_hms_opt(14, 0, 0),
            notes: None,
        };
        let change = status_change(
            &appt,
            AppointmentAction::Reschedule,
            AppointmentStatus::Rescheduled,
            Uuid::nil(),
            &input,
        );
        assert_eq!(change.from_status, AppointmentStatus::Assigned);
        assert!(change.doctor_id.is_none());
        assert!(change.reason.is_none());
        assert_eq!(change.new_date, input.new_date);

        let data = message_data(&appt, &change, Some("Ayşe Demir".into()));
        assert_eq!(data.date.as_deref(), Some("2025-11-10"));
        assert_eq!(data.new_date.as_deref(), Some("2025-11-12"));
        assert_eq!(data.new_time.as_deref(), Some("14:00"));
    }

    #[test]
    fn test_reason_routed_to_matching_message_field() {
        let appt = appointment(AppointmentStatus::UnderReview, None);
        let input = ActionInput {
            reason: Some("Please visit the emergency unit".into()),
            ..Default::default()
        };
        let change = status_change(
            &appt,
            AppointmentAction::Reject,
            AppointmentStatus::Rejected,
            Uuid::nil(),
            &input,
        );
        let data = message_data(&appt, &change, None);
        assert_eq!(
            data.rejection_reason.as_deref(),
            Some("Please visit the emergency unit")
        );
        assert!(data.cancellation_reason.is_none());
    }

    #[test]
    fn test_reason_kept_verbatim() {
        let appt = appointment(AppointmentStatus::Confirmed, Some(Uuid::new_v4()));
        let input = ActionInput {
            reason: Some("  Exam clash\n".into()),
            notes: Some("   ".into()),
            ..Default::default()
        };
        assert!(validate_input(AppointmentAction::Cancel, &input, today()).is_ok());

        let change = status_change(
            &appt,
            AppointmentAction::Cancel,
            AppointmentStatus::Cancelled,
            Uuid::nil(),
            &input,
        );
        assert_eq!(change.reason.as_deref(), Some("  Exam clash\n"));
        assert!(change.notes.is_none());

        let data = message_data(&appt, &change, None);
        assert_eq!(data.cancellation_reason.as_deref(), Some("  Exam clash\n"));
    }
}
