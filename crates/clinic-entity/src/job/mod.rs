//! Persistent queue records consumed by `clinic-worker`.

pub mod model;
pub mod payload;
pub mod status;

pub use model::{CreateJob, Job};
pub use payload::JobPayload;
pub use status::{JobPriority, JobStatus};
