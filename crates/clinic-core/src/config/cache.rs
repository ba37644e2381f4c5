//! `[cache]` section.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL for writes that do not pass one.
    pub default_ttl_seconds: u64,
    /// Entry count at which moka starts evicting.
    pub max_capacity: u64,
    /// How long a settings row is served from cache before reloading.
    pub settings_ttl_seconds: u64,
    /// How long an account status is trusted before the users table is
    /// asked again. Bounds how long a deactivated account keeps access.
    pub account_status_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: 300,
            max_capacity: 10_000,
            settings_ttl_seconds: 300,
            account_status_ttl_seconds: 30,
        }
    }
}
