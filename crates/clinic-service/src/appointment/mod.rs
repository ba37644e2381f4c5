//! Appointment booking and the status workflow.

pub mod booking;
pub mod service;
pub mod workflow;

pub use service::{AppointmentListQuery, AppointmentService, CreateAppointmentRequest};
pub use workflow::ActionInput;
