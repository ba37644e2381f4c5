//! Pruning of old notifications and finished jobs.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tracing::info;

use clinic_database::repositories::{JobRepository, NotificationRepository};
use clinic_entity::job::Job;

use crate::executor::{JobExecutionError, JobHandler};

/// Handles `notification_cleanup` jobs.
#[derive(Debug)]
pub struct NotificationCleanupHandler {
    notification_repo: Arc<NotificationRepository>,
    job_repo: Arc<JobRepository>,
    /// Max age in days before cleanup
    retention_days: i64,
}

impl NotificationCleanupHandler {
    pub fn new(
        notification_repo: Arc<NotificationRepository>,
        job_repo: Arc<JobRepository>,
        retention_days: i64,
    ) -> Self {
        Self {
            notification_repo,
            job_repo,
            retention_days: retention_days.max(1),
        }
    }
}

#[async_trait]
impl JobHandler for NotificationCleanupHandler {
    fn job_type(&self) -> &str {
        "notification_cleanup"
    }

    async fn execute(&self, _job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let cutoff = Utc::now() - Duration::days(self.retention_days);

        let notifications = self
            .notification_repo
            .delete_older_than(cutoff)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Notification cleanup failed: {e}")))?;
        let jobs = self
            .job_repo
            .cleanup_old(cutoff)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Job cleanup failed: {e}")))?;

        info!(
            notifications_removed = notifications,
            jobs_removed = jobs,
            retention_days = self.retention_days,
            "Notification cleanup finished"
        );

        Ok(Some(json!({
            "notifications_removed": notifications,
            "jobs_removed": jobs,
            "retention_days": self.retention_days,
        })))
    }
}
