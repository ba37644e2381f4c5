//! Rows of the `jobs` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::payload::JobPayload;
use super::status::{JobPriority, JobStatus};

/// One unit of queued work, such as a notification delivery or a calendar sync.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    /// Handler name; matches the `job_type` tag of [`JobPayload`].
    pub job_type: String,
    pub queue: String,
    pub priority: JobPriority,
    /// The serialized [`JobPayload`].
    pub payload: serde_json::Value,
    pub result: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub status: JobStatus,
    /// Attempts started so far, including the running one.
    pub attempts: i32,
    pub max_attempts: i32,
    /// Not claimable before this instant. Pushed forward on each retry.
    pub scheduled_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub worker_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Whether a transient failure may be retried.
    pub fn can_retry(&self) -> bool {
        self.attempts < self.max_attempts
    }
}

/// Insert payload for [`Job`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    pub job_type: String,
    pub queue: String,
    pub priority: JobPriority,
    pub payload: serde_json::Value,
    pub max_attempts: i32,
    /// Defaults to now.
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl CreateJob {
    /// A job runnable immediately, routed by `payload` to its type and queue.
    pub fn from_payload(
        payload: &JobPayload,
        priority: JobPriority,
        max_attempts: i32,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            job_type: payload.job_type().to_string(),
            queue: payload.queue().to_string(),
            priority,
            payload: serde_json::to_value(payload)?,
            max_attempts,
            scheduled_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_payload_routes_by_job_type() {
        let payload = JobPayload::CalendarSync { year: Some(2025) };
        let job = CreateJob::from_payload(&payload, JobPriority::Low, 1).unwrap();

        assert_eq!(job.job_type, "calendar_sync");
        assert_eq!(job.queue, payload.queue());
        assert_eq!(job.payload["year"], 2025);
        assert!(job.scheduled_at.is_none());
    }
}
