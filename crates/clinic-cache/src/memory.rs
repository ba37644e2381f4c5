//! In-memory cache implementation using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use clinic_core::config::cache::CacheConfig;
use clinic_core::result::AppResult;
use clinic_core::traits::cache::CacheProvider;

/// A cached value together with its own time-to-live.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory cache provider using moka.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    cache: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_capacity(config.max_capacity, Duration::from_secs(config.default_ttl_seconds))
    }

    /// Create a cache with explicit limits.
    pub fn with_capacity(max_capacity: u64, default_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache, default_ttl }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let entry = Entry {
            value: value.to_string(),
            ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn set_default(&self, key: &str, value: &str) -> AppResult<()> {
        self.set(key, value, self.default_ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.remove(key).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.cache.get(key).await.is_some())
    }

    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        let keys_to_remove: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.to_string())
            .collect();

        let count = keys_to_remove.len() as u64;
        for key in keys_to_remove {
            self.cache.remove(&key).await;
        }

        debug!(prefix, count, "Evicted cache keys by prefix");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_provider() -> MemoryCacheProvider {
        MemoryCacheProvider::with_capacity(1000, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_set_get() {
        let provider = make_provider();
        provider.set("key1", "value1", Duration::from_secs(60)).await.unwrap();
        assert_eq!(provider.get("key1").await.unwrap(), Some("value1".to_string()));
        assert!(provider.exists("key1").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let provider = make_provider();
        provider.set_default("key1", "value1").await.unwrap();
        provider.delete("key1").await.unwrap();
        assert_eq!(provider.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_per_entry_ttl() {
        let provider = make_provider();
        provider.set("short", "a", Duration::from_millis(50)).await.unwrap();
        provider.set("long", "b", Duration::from_secs(60)).await.unwrap();

        std::thread::sleep(Duration::from_millis(120));

        assert_eq!(provider.get("short").await.unwrap(), None);
        assert_eq!(provider.get("long").await.unwrap(), Some("b".to_string()));
    }

    #[tokio::test]
    async fn test_delete_prefix_leaves_other_namespaces() {
        let provider = make_provider();
        provider.set_default("clinic:setting:a", "1").await.unwrap();
        provider.set_default("clinic:setting:b", "2").await.unwrap();
        provider.set_default("clinic:jwt:blocked:x", "1").await.unwrap();

        let removed = provider.delete_prefix("clinic:setting:").await.unwrap();
        assert_eq!(removed, 2);
        assert!(provider.exists("clinic:jwt:blocked:x").await.unwrap());
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let provider = make_provider();
        provider
            .put_json("report", &vec![2024, 2025], Duration::from_secs(5))
            .await
            .unwrap();
        let years: Option<Vec<i32>> = provider.fetch_json("report").await.unwrap();
        assert_eq!(years, Some(vec![2024, 2025]));

        provider.set_default("broken", "{not json").await.unwrap();
        assert!(provider.fetch_json::<Vec<i32>>("broken").await.is_err());
    }
}
