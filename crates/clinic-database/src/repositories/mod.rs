//! Concrete repository implementations, one per aggregate.

pub mod appointment;
pub mod holiday;
pub mod job;
pub mod medical_record;
pub mod notification;
pub mod setting;
pub mod sync_report;
pub mod user;

pub use appointment::{AppointmentFilter, AppointmentRepository};
pub use holiday::HolidayRepository;
pub use job::JobRepository;
pub use medical_record::MedicalRecordRepository;
pub use notification::NotificationRepository;
pub use setting::SettingRepository;
pub use sync_report::SyncReportRepository;
pub use user::UserRepository;

use clinic_core::error::{AppError, ErrorKind};

/// Map an insert error, turning unique violations into conflicts.
pub(crate) fn map_insert_error(err: sqlx::Error, what: &str, conflict: &str) -> AppError {
    let is_unique = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if is_unique {
        AppError::conflict(conflict.to_string())
    } else {
        AppError::with_source(ErrorKind::Database, format!("Failed to create {what}"), err)
    }
}
