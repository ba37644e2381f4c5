//! Read-through cache for runtime settings.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use clinic_core::result::AppResult;
use clinic_core::traits::cache::CacheProvider;

use crate::keys;

/// Settings cache with an explicit `get(key, ttl)` / `invalidate` contract.
///
/// It holds no settings itself; values live in the injected provider
/// under `clinic:setting:*` keys and are loaded on a miss.
#[derive(Debug, Clone)]
pub struct SettingsCache {
    cache: Arc<dyn CacheProvider>,
    default_ttl: Duration,
}

impl SettingsCache {
    /// Create a settings cache on top of `cache`.
    pub fn new(cache: Arc<dyn CacheProvider>, default_ttl: Duration) -> Self {
        Self { cache, default_ttl }
    }

    /// TTL used by [`Self::get_default`].
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Return the cached value for `key`, or call `loader` and cache its
    /// result for `ttl`. Missing settings (`None`) are not cached.
    pub async fn get<F, Fut>(&self, key: &str, ttl: Duration, loader: F) -> AppResult<Option<Value>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Option<Value>>>,
    {
        let cache_key = keys::setting(key);

        if let Some(raw) = self.cache.get(&cache_key).await? {
            match serde_json::from_str(&raw) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => debug!(key, error = %e, "Discarding unreadable cached setting"),
            }
        }

        let loaded = loader().await?;
        if let Some(value) = &loaded {
            self.cache
                .set(&cache_key, &serde_json::to_string(value)?, ttl)
                .await?;
        }
        Ok(loaded)
    }

    /// [`Self::get`] with the default TTL.
    pub async fn get_default<F, Fut>(&self, key: &str, loader: F) -> AppResult<Option<Value>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Option<Value>>>,
    {
        self.get(key, self.default_ttl, loader).await
    }

    /// Drop the cached value for `key`.
    pub async fn invalidate(&self, key: &str) -> AppResult<()> {
        debug!(key, "Invalidating cached setting");
        self.cache.delete(&keys::setting(key)).await
    }

    /// Drop every cached setting.
    pub async fn invalidate_all(&self) -> AppResult<u64> {
        self.cache.delete_prefix(&keys::settings_prefix()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCacheProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn make_cache() -> SettingsCache {
        let provider = MemoryCacheProvider::with_capacity(100, Duration::from_secs(60));
        SettingsCache::new(Arc::new(provider), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_loader_called_once_until_invalidated() {
        let cache = make_cache();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let load = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Value::Bool(true)))
        };

        assert_eq!(cache.get_default("a.b", load).await.unwrap(), Some(Value::Bool(true)));
        assert_eq!(cache.get_default("a.b", load).await.unwrap(), Some(Value::Bool(true)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.invalidate("a.b").await.unwrap();
        cache.get_default("a.b", load).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_values_are_not_cached() {
        let cache = make_cache();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let load = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        };

        assert_eq!(cache.get_default("missing", load).await.unwrap(), None);
        assert_eq!(cache.get_default("missing", load).await.unwrap(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_ttl_expiry_reloads() {
        let cache = make_cache();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let load = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Value::from(3)))
        };

        cache.get("limit", Duration::from_millis(30), load).await.unwrap();
        std::thread::sleep(Duration::from_millis(80));
        cache.get("limit", Duration::from_millis(30), load).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = make_cache();
        cache.get_default("x", || async { Ok(Some(Value::from(1))) }).await.unwrap();
        cache.get_default("y", || async { Ok(Some(Value::from(2))) }).await.unwrap();
        assert_eq!(cache.invalidate_all().await.unwrap(), 2);
    }
}
