//! Runtime settings backed by the settings table.

pub mod service;

pub use service::SettingsService;
