//! Cron scheduler for periodic tasks.
//!
//! Scheduled tasks only enqueue jobs; the runner executes them.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{debug, error, info};

use clinic_core::config::worker::WorkerConfig;
use clinic_core::error::AppError;
use clinic_entity::job::{JobPayload, JobPriority};

use crate::queue::JobQueue;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Job queue for enqueuing scheduled work
    queue: Arc<JobQueue>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(queue: Arc<JobQueue>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler, queue })
    }

    /// Register the calendar sync and notification cleanup schedules.
    pub async fn register_default_tasks(&self, config: &WorkerConfig) -> Result<(), AppError> {
        self.register(
            "calendar_sync",
            &config.calendar_sync_cron,
            JobPayload::CalendarSync { year: None },
            JobPriority::Low,
        )
        .await?;
        self.register(
            "notification_cleanup",
            &config.notification_cleanup_cron,
            JobPayload::NotificationCleanup,
            JobPriority::Low,
        )
        .await?;

        info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }

    /// Enqueue `payload` every time `cron` fires.
    async fn register(
        &self,
        name: &'static str,
        cron: &str,
        payload: JobPayload,
        priority: JobPriority,
    ) -> Result<(), AppError> {
        let queue = Arc::clone(&self.queue);
        let job = CronJob::new_async(cron, move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            let payload = payload.clone();
            Box::pin(async move {
                debug!(task = name, "Scheduling job");
                if let Err(e) = queue.enqueue(&payload, priority, 1).await {
                    error!(task = name, error = %e, "Failed to enqueue scheduled job");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid cron expression for {name} ('{cron}'): {e}"))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {name} schedule: {e}")))?;

        info!(task = name, cron, "Registered scheduled task");
        Ok(())
    }
}
