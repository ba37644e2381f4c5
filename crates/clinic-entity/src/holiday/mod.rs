//! Academic calendar entities.

pub mod kind;
pub mod model;

pub use kind::HolidayKind;
pub use model::{
    AcademicHoliday, UpsertHoliday, UpsertOutcome, academic_year_label, academic_year_of,
};
