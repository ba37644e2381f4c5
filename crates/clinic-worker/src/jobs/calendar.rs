//! Scheduled academic calendar sync.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::warn;

use clinic_core::AppError;
use clinic_entity::job::{Job, JobPayload};
use clinic_service::calendar::{CalendarSyncService, SyncReportLog, current_academic_start};

use crate::executor::{JobExecutionError, JobHandler, decode_payload};

/// Handles `calendar_sync` jobs.
#[derive(Debug)]
pub struct CalendarSyncHandler {
    sync: Arc<CalendarSyncService>,
    reports: Arc<SyncReportLog>,
}

/// Year a `calendar_sync` job targets, defaulting to the current academic year.
fn target_year(job: &Job) -> Result<i32, JobExecutionError> {
    match decode_payload(job)? {
        JobPayload::CalendarSync { year } => {
            Ok(year.unwrap_or_else(|| current_academic_start(Utc::now().date_naive())))
        }
        other => Err(JobExecutionError::Permanent(format!(
            "Job {} carries a {} payload",
            job.id,
            other.job_type()
        ))),
    }
}

impl CalendarSyncHandler {
    pub fn new(sync: Arc<CalendarSyncService>, reports: Arc<SyncReportLog>) -> Self {
        Self { sync, reports }
    }
}

#[async_trait]
impl JobHandler for CalendarSyncHandler {
    fn job_type(&self) -> &str {
        "calendar_sync"
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let year = target_year(job)?;

        let report = self.sync.sync(year).await;
        let value = serde_json::to_value(&report).map_err(AppError::from)?;
        if let Err(e) = self.reports.record(&report).await {
            warn!(year, error = %e, "Failed to record calendar sync report");
        }

        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::tests::job;

    #[test]
    fn test_target_year() {
        let explicit = job(&JobPayload::CalendarSync { year: Some(2027) });
        assert_eq!(target_year(&explicit).unwrap(), 2027);

        let current = job(&JobPayload::CalendarSync { year: None });
        assert_eq!(
            target_year(&current).unwrap(),
            current_academic_start(Utc::now().date_naive())
        );

        let wrong = job(&JobPayload::NotificationCleanup);
        assert!(matches!(
            target_year(&wrong),
            Err(JobExecutionError::Permanent(_))
        ));
    }
}
