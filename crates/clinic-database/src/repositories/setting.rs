//! Settings repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use clinic_core::error::{AppError, ErrorKind};
use clinic_core::result::AppResult;
use clinic_entity::setting::Setting;

/// Repository for runtime settings.
#[derive(Debug, Clone)]
pub struct SettingRepository {
    pool: PgPool,
}

impl SettingRepository {
    /// Create a new settings repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a setting by key.
    pub async fn find(&self, key: &str) -> AppResult<Option<Setting>> {
        sqlx::query_as::<_, Setting>("SELECT * FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read setting", e))
    }

    /// All settings ordered by key.
    pub async fn find_all(&self) -> AppResult<Vec<Setting>> {
        sqlx::query_as::<_, Setting>("SELECT * FROM settings ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list settings", e))
    }

    /// Insert or replace a setting value.
    pub async fn upsert(
        &self,
        key: &str,
        value: &serde_json::Value,
        updated_by: Uuid,
    ) -> AppResult<Setting> {
        sqlx::query_as::<_, Setting>(
            "INSERT INTO settings (key, value, updated_by) VALUES ($1, $2, $3) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, \
             updated_by = EXCLUDED.updated_by, updated_at = NOW() RETURNING *",
        )
        .bind(key)
        .bind(value)
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write setting", e))
    }
}
