//! Academic holiday entity model.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::HolidayKind;

/// A calendar entry that may block appointment booking.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AcademicHoliday {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name (unique per academic year).
    pub name: String,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Classification.
    pub holiday_type: HolidayKind,
    /// Whether booking is closed on these days.
    pub blocks_appointments: bool,
    /// Where the entry came from (URL, `national`, `manual`, ...).
    pub source: String,
    /// Academic year label, e.g. `2025-2026`.
    pub academic_year: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AcademicHoliday {
    /// Whether `date` falls inside this entry.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Insert-or-update input keyed by `(name, academic_year)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertHoliday {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub holiday_type: HolidayKind,
    pub blocks_appointments: bool,
    pub source: String,
    pub academic_year: String,
}

/// Whether an upsert created a new row or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Academic year label for a year starting in autumn of `year`.
pub fn academic_year_label(year: i32) -> String {
    format!("{}-{}", year, year + 1)
}

/// Academic year a date belongs to. Years roll over on September 1st.
pub fn academic_year_of(date: NaiveDate) -> String {
    if date.month() >= 9 {
        academic_year_label(date.year())
    } else {
        academic_year_label(date.year() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_academic_year_rollover() {
        let autumn = NaiveDate::from_ymd_opt(2025, 10, 29).unwrap();
        let spring = NaiveDate::from_ymd_opt(2026, 4, 23).unwrap();
        assert_eq!(academic_year_of(autumn), "2025-2026");
        assert_eq!(academic_year_of(spring), "2025-2026");
        assert_eq!(academic_year_label(2024), "2024-2025");
    }
}
