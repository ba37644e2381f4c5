//! # clinic-entity
//!
//! Domain entity models for the campus clinic backend. Each module
//! holds the `FromRow` model, its enums, and the `Create*` input
//! structs consumed by the repositories.
//!
//! The appointment module is also the single source of truth for the
//! status transition table and the role-gated action catalogue.

pub mod appointment;
pub mod holiday;
pub mod job;
pub mod medical_record;
pub mod notification;
pub mod setting;
pub mod user;
