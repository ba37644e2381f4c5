//! Worker runner: the loop that polls for jobs and executes them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::time;
use tracing::{error, info, trace, warn};

use clinic_core::config::worker::WorkerConfig;
use clinic_entity::job::Job;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::queue::JobQueue;

/// How long shutdown waits for in-flight jobs.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Main worker runner that polls queues and executes jobs
#[derive(Debug)]
pub struct WorkerRunner {
    /// Job queue for polling
    queue: Arc<JobQueue>,
    /// Job executor for dispatching
    executor: Arc<JobExecutor>,
    /// Worker configuration
    config: WorkerConfig,
    /// Queues to poll (in priority order)
    queues: Vec<String>,
}

impl WorkerRunner {
    /// Create a new worker runner
    pub fn new(queue: Arc<JobQueue>, executor: Arc<JobExecutor>, config: WorkerConfig) -> Self {
        Self {
            queue,
            executor,
            config,
            queues: vec!["notifications".to_string(), "maintenance".to_string()],
        }
    }

    /// Run until the cancel signal is received
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let worker_id = self.queue.worker_id().to_string();
        let concurrency = self.config.concurrency.max(1);
        info!(
            worker_id = %worker_id,
            concurrency,
            poll_interval_seconds = self.config.poll_interval_seconds,
            queues = ?self.queues,
            "Worker started"
        );

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let poll_interval = Duration::from_secs(self.config.poll_interval_seconds.max(1));

        loop {
            if *cancel.borrow() {
                break;
            }

            // Keep claiming while there is work and a free slot.
            let claimed = self.poll_and_execute(&semaphore).await;
            if claimed {
                continue;
            }

            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
                _ = time::sleep(poll_interval) => {}
            }
        }

        info!(worker_id = %worker_id, "Worker waiting for in-flight jobs");
        let _ = time::timeout(DRAIN_TIMEOUT, semaphore.acquire_many(concurrency as u32)).await;
        info!(worker_id = %worker_id, "Worker shut down");
    }

    /// Claim one job and spawn it. Returns whether a job was claimed.
    async fn poll_and_execute(&self, semaphore: &Arc<Semaphore>) -> bool {
        let Ok(permit) = semaphore.clone().try_acquire_owned() else {
            trace!("All worker slots occupied");
            return false;
        };

        let queue_refs: Vec<&str> = self.queues.iter().map(String::as_str).collect();

        match self.queue.dequeue(&queue_refs).await {
            Ok(Some(job)) => {
                let queue = Arc::clone(&self.queue);
                let executor = Arc::clone(&self.executor);
                tokio::spawn(async move {
                    let _permit = permit;
                    let outcome = executor.execute(&job).await;
                    settle(&queue, &job, outcome).await;
                });
                true
            }
            Ok(None) => {
                trace!("No jobs available");
                false
            }
            Err(e) => {
                error!(error = %e, "Failed to dequeue job");
                false
            }
        }
    }
}

/// Record the outcome of one execution.
async fn settle(
    queue: &JobQueue,
    job: &Job,
    outcome: Result<Option<serde_json::Value>, JobExecutionError>,
) {
    let result = match outcome {
        Ok(result) => {
            info!(job_id = %job.id, job_type = %job.job_type, "Job completed");
            queue.complete(job.id, result.as_ref()).await
        }
        Err(JobExecutionError::Transient(msg)) if job.can_retry() => {
            warn!(
                job_id = %job.id,
                attempt = job.attempts,
                max_attempts = job.max_attempts,
                error = %msg,
                "Job failed, will retry"
            );
            queue.retry(job, &msg).await
        }
        Err(e) => {
            error!(job_id = %job.id, job_type = %job.job_type, error = %e, "Job failed");
            queue.fail(job.id, &e.to_string()).await
        }
    };

    if let Err(e) = result {
        error!(job_id = %job.id, error = %e, "Failed to record job outcome");
    }
}
