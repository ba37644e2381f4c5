//! Booking rules checked before an appointment row is written or changed.

use chrono::NaiveDate;

use clinic_core::error::{AppError, codes};
use clinic_entity::appointment::Appointment;
use clinic_entity::holiday::AcademicHoliday;
use clinic_entity::user::User;

use super::service::CreateAppointmentRequest;
use crate::context::RequestContext;

/// Only students and academic staff book.
pub fn ensure_patient(ctx: &RequestContext) -> Result<(), AppError> {
    if ctx.is_patient() {
        Ok(())
    } else {
        Err(AppError::forbidden(
            codes::INSUFFICIENT_PERMISSIONS,
            "Only students and academic staff can book appointments",
        ))
    }
}

/// Patients verify their email before their first booking.
pub fn ensure_verified(patient: &User) -> Result<(), AppError> {
    if patient.email_verified {
        Ok(())
    } else {
        Err(AppError::forbidden(
            codes::EMAIL_NOT_VERIFIED,
            "Verify your email address before booking an appointment",
        ))
    }
}

/// The trimmed reason of a booking request dated `today` or later.
pub fn validate_request<'a>(
    req: &'a CreateAppointmentRequest,
    today: NaiveDate,
) -> Result<&'a str, AppError> {
    let reason = req.reason.trim();
    if reason.is_empty() {
        return Err(AppError::invalid_field("reason", "A reason is required"));
    }
    if req.appointment_date < today {
        return Err(AppError::invalid_field(
            "appointment_date",
            "The appointment date cannot be in the past",
        ));
    }
    Ok(reason)
}

/// A patient holds at most `max_open` appointments that are not yet final.
pub fn ensure_below_open_limit(open: i64, max_open: i64) -> Result<(), AppError> {
    if open >= max_open {
        return Err(AppError::validation(format!(
            "You already have {open} open appointments; the limit is {max_open}"
        )));
    }
    Ok(())
}

/// Reject `date` when a blocking holiday covers it and holiday blocking is on.
pub fn ensure_date_open(
    block_on_holidays: bool,
    date: NaiveDate,
    field: &str,
    holidays: &[AcademicHoliday],
) -> Result<(), AppError> {
    if !block_on_holidays {
        return Ok(());
    }
    match holidays
        .iter()
        .find(|h| h.blocks_appointments && h.covers(date))
    {
        None => Ok(()),
        Some(holiday) => Err(AppError::invalid_field(
            field,
            format!("{date} falls on '{}'; the clinic is closed", holiday.name),
        )
        .with_code(codes::DATE_BLOCKED)),
    }
}

/// The row a guarded status update returned. `None` means another request
/// moved the appointment first.
pub fn require_applied(updated: Option<Appointment>) -> Result<Appointment, AppError> {
    updated.ok_or_else(|| {
        AppError::conflict("The appointment was changed by another request; reload and retry")
    })
}
