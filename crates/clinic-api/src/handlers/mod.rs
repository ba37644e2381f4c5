//! Request handlers grouped by resource.

pub mod admin;
pub mod appointment;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod holiday;
pub mod medical_record;
pub mod notification;
pub mod ws;
