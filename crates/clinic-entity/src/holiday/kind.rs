//! Academic holiday type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification of a calendar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "holiday_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HolidayKind {
    /// Official public holiday.
    NationalHoliday,
    /// Religious festival (dates move every year).
    ReligiousHoliday,
    /// Break between semesters.
    SemesterBreak,
    /// Midterm or final examination period.
    ExamPeriod,
    /// Course registration window.
    Registration,
    /// Anything else found in a calendar.
    Other,
}

impl HolidayKind {
    /// Whether entries of this kind close the clinic for booking by default.
    pub fn blocks_appointments_by_default(&self) -> bool {
        matches!(self, Self::NationalHoliday | Self::ReligiousHoliday)
    }

    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NationalHoliday => "national_holiday",
            Self::ReligiousHoliday => "religious_holiday",
            Self::SemesterBreak => "semester_break",
            Self::ExamPeriod => "exam_period",
            Self::Registration => "registration",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for HolidayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HolidayKind {
    type Err = clinic_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "national_holiday" => Ok(Self::NationalHoliday),
            "religious_holiday" => Ok(Self::ReligiousHoliday),
            "semester_break" => Ok(Self::SemesterBreak),
            "exam_period" => Ok(Self::ExamPeriod),
            "registration" => Ok(Self::Registration),
            "other" => Ok(Self::Other),
            _ => Err(clinic_core::AppError::invalid_field(
                "type",
                format!("Invalid holiday type: '{s}'"),
            )),
        }
    }
}
