//! Academic calendar: sync from published PDFs and holiday lookups.
//!
//! ## Pipeline
//!
//! 1. Probe candidate URLs and fetch known sources ([`fetcher`])
//! 2. Extract dated entries with the regex rule engine ([`rules`])
//! 3. Classify each entry by keywords on its line ([`classify`])
//! 4. Append fixed national holidays ([`national`])
//! 5. Upsert through a [`store::HolidayStore`]
//! 6. Record the run's [`SyncReport`] through a [`reports::SyncReportLog`]

pub mod classify;
pub mod fetcher;
pub mod holidays;
pub mod national;
pub mod reports;
pub mod rules;
pub mod service;
pub mod store;

pub use fetcher::{CalendarFetcher, HttpCalendarFetcher};
pub use holidays::{HolidayCheck, HolidayService};
pub use reports::{SyncReportLog, SyncReportStore};
pub use service::{CalendarSyncService, SyncReport, current_academic_start};
pub use store::HolidayStore;
