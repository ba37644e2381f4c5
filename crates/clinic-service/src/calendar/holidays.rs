//! Holiday lookups for booking and the public calendar endpoints.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use clinic_core::error::AppError;
use clinic_database::repositories::HolidayRepository;
use clinic_entity::holiday::AcademicHoliday;

/// Whether booking is closed on a date, and why.
#[derive(Debug, Clone, Serialize)]
pub struct HolidayCheck {
    pub date: NaiveDate,
    pub blocked: bool,
    /// Blocking entries covering the date.
    pub holidays: Vec<AcademicHoliday>,
}

/// Read access to stored calendar entries.
#[derive(Debug, Clone)]
pub struct HolidayService {
    holiday_repo: Arc<HolidayRepository>,
}

impl HolidayService {
    pub fn new(holiday_repo: Arc<HolidayRepository>) -> Self {
        Self { holiday_repo }
    }

    /// Entries of one academic year (`2025-2026`), or all of them.
    pub async fn list(&self, academic_year: Option<&str>) -> Result<Vec<AcademicHoliday>, AppError> {
        if let Some(label) = academic_year {
            validate_academic_year(label)?;
        }
        self.holiday_repo.find_all(academic_year).await
    }

    /// Check whether `date` is closed for booking.
    pub async fn check(&self, date: NaiveDate) -> Result<HolidayCheck, AppError> {
        let holidays = self.holiday_repo.find_blocking_on(date).await?;
        Ok(HolidayCheck {
            date,
            blocked: !holidays.is_empty(),
            holidays,
        })
    }
}

/// Accept only `YYYY-YYYY` labels with consecutive years.
fn validate_academic_year(label: &str) -> Result<(), AppError> {
    let valid = label
        .split_once('-')
        .and_then(|(a, b)| Some((a.parse::<i32>().ok()?, b.parse::<i32>().ok()?)))
        .is_some_and(|(a, b)| a.to_string().len() == 4 && b == a + 1);
    if valid {
        Ok(())
    } else {
        Err(AppError::invalid_field(
            "academic_year",
            format!("Expected an academic year like 2025-2026, got '{label}'"),
        ))
    }
}
