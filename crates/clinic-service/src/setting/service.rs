//! Read-through settings access with cache invalidation on write.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use clinic_cache::SettingsCache;
use clinic_core::error::AppError;
use clinic_database::repositories::SettingRepository;
use clinic_entity::setting::{Setting, keys};

use crate::context::RequestContext;

/// Reads and writes runtime settings.
#[derive(Debug, Clone)]
pub struct SettingsService {
    repo: Arc<SettingRepository>,
    cache: SettingsCache,
}

/// Type check applied before a known setting is written.
fn validate_known(key: &str, value: &Value) -> Result<(), AppError> {
    let ok = match key {
        keys::BLOCK_ON_HOLIDAYS => value.is_boolean(),
        keys::MAX_PENDING_PER_PATIENT => value.as_i64().is_some_and(|n| n >= 1),
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(AppError::invalid_field(
            "value",
            format!("Invalid value for setting '{key}'"),
        ))
    }
}

impl SettingsService {
    /// Creates a new settings service.
    pub fn new(repo: Arc<SettingRepository>, cache: SettingsCache) -> Self {
        Self { repo, cache }
    }

    /// Raw JSON value of `key`, through the cache.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        let repo = Arc::clone(&self.repo);
        let owned = key.to_string();
        self.cache
            .get_default(key, move || async move {
                Ok::<_, AppError>(repo.find(&owned).await?.map(|s| s.value))
            })
            .await
    }

    /// Boolean setting, `default` when missing or not a boolean.
    pub async fn get_bool(&self, key: &str, default: bool) -> Result<bool, AppError> {
        Ok(self
            .get(key)
            .await?
            .and_then(|v| v.as_bool())
            .unwrap_or(default))
    }

    /// Integer setting, `default` when missing or not an integer.
    pub async fn get_i64(&self, key: &str, default: i64) -> Result<i64, AppError> {
        Ok(self
            .get(key)
            .await?
            .and_then(|v| v.as_i64())
            .unwrap_or(default))
    }

    /// Every setting, read straight from the table.
    pub async fn list(&self) -> Result<Vec<Setting>, AppError> {
        self.repo.find_all().await
    }

    /// Write a setting and drop its cached value.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        key: &str,
        value: Value,
    ) -> Result<Setting, AppError> {
        validate_known(key, &value)?;
        let setting = self.repo.upsert(key, &value, ctx.user_id).await?;
        self.cache.invalidate(key).await?;

        info!(key, admin_id = %ctx.user_id, "Setting updated");
        Ok(setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_settings_are_type_checked() {
        assert!(validate_known(keys::BLOCK_ON_HOLIDAYS, &json!(false)).is_ok());
        assert!(validate_known(keys::BLOCK_ON_HOLIDAYS, &json!("yes")).is_err());
        assert!(validate_known(keys::MAX_PENDING_PER_PATIENT, &json!(5)).is_ok());
        assert!(validate_known(keys::MAX_PENDING_PER_PATIENT, &json!(0)).is_err());
        assert!(validate_known("ui.banner", &json!({"text": "hi"})).is_ok());
    }
}
