//! Lifecycle and ordering of queued work.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a job sits in the queue.
///
/// `Pending` covers both fresh jobs and jobs put back for a retry; the
/// `scheduled_at` column tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    /// Claimed by the worker named in `worker_id`.
    Running,
    Completed,
    /// Out of attempts, or failed with a permanent error.
    Failed,
    Cancelled,
}

impl JobStatus {
    /// No worker will touch the job again.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim order within a queue. Variants are declared in the same order as
/// the `job_priority` enum in Postgres, so `ORDER BY priority DESC` and
/// [`Ord`] agree.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "job_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobPriority {
    /// Housekeeping such as calendar syncs and notification cleanup.
    Low,
    /// Patient-facing deliveries.
    #[default]
    Normal,
    High,
}

impl JobPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl fmt::Display for JobPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
