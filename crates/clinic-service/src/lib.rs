//! # clinic-service
//!
//! Business logic service layer for the campus clinic. Each service
//! orchestrates repositories, the cache, authentication, and the event
//! bus to implement one application-level use case.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod appointment;
pub mod calendar;
pub mod context;
pub mod dashboard;
pub mod medical_record;
pub mod notification;
pub mod setting;
pub mod user;

pub use appointment::AppointmentService;
pub use calendar::{CalendarSyncService, HolidayService, SyncReport, SyncReportLog};
pub use context::RequestContext;
pub use dashboard::DashboardService;
pub use medical_record::MedicalRecordService;
pub use notification::{NotificationDispatcher, NotificationService};
pub use setting::SettingsService;
pub use user::{AccountGuard, AccountStatuses, AdminUserService, AuthService};
