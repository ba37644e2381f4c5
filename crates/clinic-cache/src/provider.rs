//! The cache handle carried in application state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use clinic_core::config::cache::CacheConfig;
use clinic_core::result::AppResult;
use clinic_core::traits::cache::CacheProvider;

use crate::memory::MemoryCacheProvider;
use crate::settings::SettingsCache;

/// Cloneable handle over one shared cache backend.
///
/// The JWT blocklist, the settings cache, and cached calendar sync reports
/// all write through the same instance, so a clone seen by the worker and
/// one seen by the API observe the same entries.
#[derive(Debug, Clone)]
pub struct CacheManager {
    backend: Arc<dyn CacheProvider>,
}

impl CacheManager {
    pub fn new(config: &CacheConfig) -> Self {
        info!(
            max_capacity = config.max_capacity,
            default_ttl_seconds = config.default_ttl_seconds,
            "In-memory cache ready"
        );
        Self {
            backend: Arc::new(MemoryCacheProvider::new(config)),
        }
    }

    /// A [`SettingsCache`] sharing this backend.
    pub fn settings(&self, ttl: Duration) -> SettingsCache {
        SettingsCache::new(Arc::clone(&self.backend), ttl)
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.backend.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.backend.set(key, value, ttl).await
    }

    async fn set_default(&self, key: &str, value: &str) -> AppResult<()> {
        self.backend.set_default(key, value).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.backend.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.backend.exists(key).await
    }

    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        self.backend.delete_prefix(prefix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = CacheManager::new(&CacheConfig::default());
        let other = cache.clone();

        cache.set_default("clinic:probe", "1").await.unwrap();
        assert!(other.exists("clinic:probe").await.unwrap());
    }

    #[tokio::test]
    async fn test_settings_cache_uses_same_backend() {
        let cache = CacheManager::new(&CacheConfig::default());
        let settings = cache.settings(Duration::from_secs(30));

        settings
            .get_default("booking.open", || async { Ok(Some(Value::Bool(true))) })
            .await
            .unwrap();
        assert!(cache.exists(&crate::keys::setting("booking.open")).await.unwrap());
    }
}
