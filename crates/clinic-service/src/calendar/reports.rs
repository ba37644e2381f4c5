//! Last sync report per academic year.
//!
//! Reports are persisted so a sync run from the CLI, the worker, or the
//! admin API is readable from any process. The cache sits in front of the
//! store for repeated reads.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use clinic_cache::{CacheManager, keys};
use clinic_core::result::AppResult;
use clinic_core::traits::cache::CacheProvider;
use clinic_database::repositories::SyncReportRepository;

use super::service::SyncReport;

/// How long a report read stays in cache.
const REPORT_TTL: Duration = Duration::from_secs(30 * 24 * 3600);

/// Where sync reports are persisted.
#[async_trait]
pub trait SyncReportStore: Send + Sync + std::fmt::Debug + 'static {
    async fn save(&self, year: i32, report: &Value) -> AppResult<()>;

    async fn find(&self, year: i32) -> AppResult<Option<Value>>;
}

#[async_trait]
impl SyncReportStore for SyncReportRepository {
    async fn save(&self, year: i32, report: &Value) -> AppResult<()> {
        SyncReportRepository::save(self, year, report).await
    }

    async fn find(&self, year: i32) -> AppResult<Option<Value>> {
        SyncReportRepository::find(self, year).await
    }
}

/// Persisted, cached sync reports.
#[derive(Debug, Clone)]
pub struct SyncReportLog {
    store: Arc<dyn SyncReportStore>,
    cache: CacheManager,
}

impl SyncReportLog {
    pub fn new(store: Arc<dyn SyncReportStore>, cache: CacheManager) -> Self {
        Self { store, cache }
    }

    /// Persist `report` as the latest for its year.
    pub async fn record(&self, report: &SyncReport) -> AppResult<()> {
        let value = serde_json::to_value(report)?;
        self.store.save(report.year, &value).await?;
        self.cache
            .put_json(&keys::calendar_sync_report(report.year), &value, REPORT_TTL)
            .await
    }

    /// Latest report for `year`, if any run has recorded one.
    pub async fn last(&self, year: i32) -> AppResult<Option<Value>> {
        let key = keys::calendar_sync_report(year);
        if let Some(report) = self.cache.fetch_json::<Value>(&key).await? {
            return Ok(Some(report));
        }

        let stored = self.store.find(year).await?;
        if let Some(report) = &stored {
            debug!(year, "Caching stored calendar sync report");
            self.cache.put_json(&key, report, REPORT_TTL).await?;
        }
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tokio::sync::Mutex;

    use super::*;
    use clinic_core::config::cache::CacheConfig;

    #[derive(Debug, Default)]
    struct MemoryReports {
        rows: Mutex<HashMap<i32, Value>>,
    }

    #[async_trait]
    impl SyncReportStore for MemoryReports {
        async fn save(&self, year: i32, report: &Value) -> AppResult<()> {
            self.rows.lock().await.insert(year, report.clone());
            Ok(())
        }

        async fn find(&self, year: i32) -> AppResult<Option<Value>> {
            Ok(self.rows.lock().await.get(&year).cloned())
        }
    }

    fn log(store: &Arc<MemoryReports>) -> SyncReportLog {
        let store: Arc<dyn SyncReportStore> = store.clone();
        SyncReportLog::new(store, CacheManager::new(&CacheConfig::default()))
    }

    #[tokio::test]
    async fn test_report_recorded_elsewhere_is_readable() {
        let store = Arc::new(MemoryReports::default());
        // Separate caches stand in for the CLI and the server processes.
        let cli = log(&store);
        let server = log(&store);

        let report = SyncReport {
            year: 2025,
            academic_year: "2025-2026".to_string(),
            synced: 7,
            updated: 2,
            ..Default::default()
        };
        cli.record(&report).await.unwrap();

        let found = server.last(2025).await.unwrap().expect("report stored");
        assert_eq!(found["academic_year"], "2025-2026");
        assert_eq!(found["synced"], 7);
        assert!(server.cache.exists(&keys::calendar_sync_report(2025)).await.unwrap());

        assert!(server.last(2024).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_newer_report_replaces_older() {
        let store = Arc::new(MemoryReports::default());
        let reports = log(&store);

        for synced in [3, 5] {
            let report = SyncReport {
                year: 2026,
                academic_year: "2026-2027".to_string(),
                synced,
                ..Default::default()
            };
            reports.record(&report).await.unwrap();
        }

        assert_eq!(reports.last(2026).await.unwrap().unwrap()["synced"], 5);
        assert_eq!(store.rows.lock().await[&2026]["synced"], 5);
    }
}
