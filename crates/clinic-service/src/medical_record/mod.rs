//! Medical records written after completed visits.

pub mod service;

pub use service::{CreateMedicalRecordRequest, MedicalRecordService};
