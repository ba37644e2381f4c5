//! Calendar sync report repository implementation.

use serde_json::Value;
use sqlx::PgPool;

use clinic_core::error::{AppError, ErrorKind};
use clinic_core::result::AppResult;

/// Last sync report per academic year, written by the server, the worker,
/// and the CLI alike.
#[derive(Debug, Clone)]
pub struct SyncReportRepository {
    pool: PgPool,
}

impl SyncReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace the stored report for `year`.
    pub async fn save(&self, year: i32, report: &Value) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO calendar_sync_reports (year, report) VALUES ($1, $2) \
             ON CONFLICT (year) DO UPDATE SET report = EXCLUDED.report, synced_at = NOW()",
        )
        .bind(year)
        .bind(report)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save sync report", e))?;
        Ok(())
    }

    pub async fn find(&self, year: i32) -> AppResult<Option<Value>> {
        sqlx::query_scalar::<_, Value>("SELECT report FROM calendar_sync_reports WHERE year = $1")
            .bind(year)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read sync report", e))
    }
}
