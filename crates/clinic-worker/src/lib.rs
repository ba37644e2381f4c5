//! Background job processing and scheduled tasks for the clinic backend.
//!
//! This crate provides:
//! - A worker runner that polls for and executes queued jobs
//! - A cron scheduler that enqueues calendar sync and notification cleanup
//! - A job executor that dispatches jobs to the correct handler
//! - Notification delivery over in-app, email, SMS and push channels

pub mod executor;
pub mod jobs;
pub mod mail;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use mail::{LoggingMailTransport, MailTransport, OutgoingMail};
pub use queue::JobQueue;
pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;
