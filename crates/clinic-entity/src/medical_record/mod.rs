//! Medical record entities.

pub mod model;

pub use model::{CreateMedicalRecord, MedicalRecord};
