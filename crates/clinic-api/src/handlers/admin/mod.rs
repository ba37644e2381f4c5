//! Administrator endpoints.

pub mod calendar;
pub mod settings;
pub mod users;
