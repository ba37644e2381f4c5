//! Key/value cache seam shared by the auth, settings, and calendar code.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::result::AppResult;

/// String-valued cache with a TTL on every write.
///
/// Keys are namespaced strings built by `clinic_cache::keys`. Structured
/// values go through [`CacheProvider::put_json`] and
/// [`CacheProvider::fetch_json`].
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Value under `key`, or `None` once it has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key` for `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Store `value` under `key` for the provider's configured TTL.
    async fn set_default(&self, key: &str, value: &str) -> AppResult<()>;

    async fn delete(&self, key: &str) -> AppResult<()>;

    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Remove every key starting with `prefix`, returning how many went.
    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64>;

    /// Deserialize the JSON stored under `key`.
    async fn fetch_json<T>(&self, key: &str) -> AppResult<Option<T>>
    where
        Self: Sized,
        T: DeserializeOwned + Send,
    {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Serialize `value` as JSON and store it for `ttl`.
    async fn put_json<T>(&self, key: &str, value: &T, ttl: Duration) -> AppResult<()>
    where
        Self: Sized,
        T: Serialize + Send + Sync,
    {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw, ttl).await
    }
}
