//! `[worker]` section.

use serde::{Deserialize, Serialize};

/// Job runner and cron schedule. Cron expressions include a seconds field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Run the job runner and scheduler inside the server process.
    pub enabled: bool,
    /// Jobs executed at the same time.
    pub concurrency: usize,
    /// Sleep between polls when every queue is empty.
    pub poll_interval_seconds: u64,
    /// Monthly by default, at 03:00 on the 1st.
    pub calendar_sync_cron: String,
    pub notification_cleanup_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrency: 4,
            poll_interval_seconds: 5,
            calendar_sync_cron: "0 0 3 1 * *".to_string(),
            notification_cleanup_cron: "0 30 4 * * *".to_string(),
        }
    }
}
