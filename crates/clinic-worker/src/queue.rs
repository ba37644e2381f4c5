//! Job queue abstraction for enqueuing and dequeuing background jobs.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use clinic_core::error::AppError;
use clinic_database::repositories::JobRepository;
use clinic_entity::job::{CreateJob, Job, JobPayload, JobPriority};

/// Base delay before a failed job is retried; doubles per attempt.
const RETRY_BASE_SECONDS: i64 = 30;
/// Upper bound on the retry delay.
const RETRY_MAX_SECONDS: i64 = 3600;

/// Delay before retrying a job that has already run `attempts` times.
pub fn retry_delay_seconds(attempts: i32) -> i64 {
    let exponent = attempts.clamp(1, 16) as u32 - 1;
    (RETRY_BASE_SECONDS << exponent).min(RETRY_MAX_SECONDS)
}

/// Job queue for enqueuing and dequeuing work
#[derive(Debug, Clone)]
pub struct JobQueue {
    /// Job repository for database persistence
    repo: Arc<JobRepository>,
    /// Worker identifier for claiming jobs
    worker_id: String,
}

impl JobQueue {
    /// Create a new job queue
    pub fn new(repo: Arc<JobRepository>, worker_id: String) -> Self {
        Self { repo, worker_id }
    }

    /// Identifier this queue claims jobs under.
    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Enqueue a typed job on its queue.
    pub async fn enqueue(
        &self,
        payload: &JobPayload,
        priority: JobPriority,
        max_attempts: i32,
    ) -> Result<Job, AppError> {
        let job = self
            .repo
            .create(&CreateJob::from_payload(payload, priority, max_attempts)?)
            .await?;

        debug!(
            job_id = %job.id,
            job_type = %job.job_type,
            queue = %job.queue,
            priority = %job.priority,
            "Enqueued job"
        );

        Ok(job)
    }

    /// Dequeue the next available job from specified queues
    pub async fn dequeue(&self, queues: &[&str]) -> Result<Option<Job>, AppError> {
        for queue in queues {
            if let Some(job) = self.repo.dequeue(queue, &self.worker_id).await? {
                debug!(
                    job_id = %job.id,
                    job_type = %job.job_type,
                    queue = %job.queue,
                    "Dequeued job"
                );
                return Ok(Some(job));
            }
        }

        Ok(None)
    }

    /// Mark a job as completed successfully
    pub async fn complete(&self, job_id: Uuid, result: Option<&Value>) -> Result<(), AppError> {
        self.repo.complete(job_id, result).await?;
        debug!(job_id = %job_id, "Job completed");
        Ok(())
    }

    /// Mark a job as failed
    pub async fn fail(&self, job_id: Uuid, error: &str) -> Result<(), AppError> {
        self.repo.fail(job_id, error).await?;
        debug!(job_id = %job_id, error, "Job failed");
        Ok(())
    }

    /// Put a job back on its queue with exponential backoff.
    pub async fn retry(&self, job: &Job, error: &str) -> Result<(), AppError> {
        let delay = retry_delay_seconds(job.attempts);
        self.repo.reschedule(job.id, error, delay).await?;
        debug!(job_id = %job.id, delay_seconds = delay, "Job rescheduled");
        Ok(())
    }
}
