//! Job executor: dispatches jobs to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use clinic_core::error::AppError;
use clinic_entity::job::{Job, JobPayload};

/// Trait for job handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// Get the job type this handler processes
    fn job_type(&self) -> &str;

    /// Execute the job with the given payload
    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure, do not retry
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure, may retry
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

/// Decode the typed payload of a job.
pub fn decode_payload(job: &Job) -> Result<JobPayload, JobExecutionError> {
    serde_json::from_value(job.payload.clone()).map_err(|e| {
        JobExecutionError::Permanent(format!("Malformed payload for job {}: {e}", job.id))
    })
}

/// Dispatches jobs to the appropriate handler based on job_type
#[derive(Debug, Default)]
pub struct JobExecutor {
    /// Registered job handlers by type
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    /// Create a new job executor
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type().to_string();
        info!(job_type = %job_type, "Registered job handler");
        self.handlers.insert(job_type, handler);
    }

    /// Execute a job by dispatching to the correct handler
    pub async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let handler = self.handlers.get(&job.job_type).ok_or_else(|| {
            JobExecutionError::Permanent(format!(
                "No handler registered for job type '{}'",
                job.job_type
            ))
        })?;

        info!(
            job_id = %job.id,
            job_type = %job.job_type,
            attempt = job.attempts,
            max_attempts = job.max_attempts,
            "Executing job"
        );

        handler.execute(job).await
    }

    /// Check if a handler is registered for a job type
    pub fn has_handler(&self, job_type: &str) -> bool {
        self.handlers.contains_key(job_type)
    }

    /// Get the list of registered job types
    pub fn registered_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.keys().cloned().collect();
        types.sort();
        types
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Utc;
    use clinic_entity::job::{JobPriority, JobStatus};
    use uuid::Uuid;

    use super::*;

    pub(crate) fn job(payload: &JobPayload) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4(),
            job_type: payload.job_type().to_string(),
            queue: payload.queue().to_string(),
            priority: JobPriority::Normal,
            payload: serde_json::to_value(payload).unwrap(),
            result: None,
            error_message: None,
            status: JobStatus::Running,
            attempts: 1,
            max_attempts: 3,
            scheduled_at: now,
            started_at: Some(now),
            completed_at: None,
            worker_id: Some("test".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[derive(Debug)]
    struct Echo;

    #[async_trait]
    impl JobHandler for Echo {
        fn job_type(&self) -> &str {
            "notification_cleanup"
        }

        async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
            Ok(Some(job.payload.clone()))
        }
    }

    #[tokio::test]
    async fn test_dispatches_by_job_type() {
        let mut executor = JobExecutor::new();
        executor.register(Arc::new(Echo));
        assert!(executor.has_handler("notification_cleanup"));

        let result = executor
            .execute(&job(&JobPayload::NotificationCleanup))
            .await
            .unwrap();
        assert_eq!(result.unwrap()["job_type"], "notification_cleanup");
    }

    #[tokio::test]
    async fn test_unknown_job_type_is_permanent() {
        let executor = JobExecutor::new();
        let err = executor
            .execute(&job(&JobPayload::CalendarSync { year: None }))
            .await
            .unwrap_err();
        assert!(matches!(err, JobExecutionError::Permanent(_)));
    }

    #[test]
    fn test_decode_payload() {
        let payload = JobPayload::CalendarSync { year: Some(2025) };
        assert_eq!(decode_payload(&job(&payload)).unwrap(), payload);

        let mut broken = job(&payload);
        broken.payload = serde_json::json!({ "job_type": "teleport" });
        assert!(matches!(
            decode_payload(&broken),
            Err(JobExecutionError::Permanent(_))
        ));
    }
}
