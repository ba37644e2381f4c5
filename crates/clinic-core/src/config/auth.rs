//! `[auth]` section: token lifetimes and password policy.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Placeholder shipped in `config/default.toml`.
pub const PLACEHOLDER_JWT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing key shared by the encoder and decoder.
    pub jwt_secret: String,
    pub jwt_access_ttl_minutes: u64,
    pub jwt_refresh_ttl_hours: u64,
    pub password_min_length: usize,
    /// zxcvbn score from 0 to 4; higher values are clamped.
    pub password_min_score: u8,
}

impl AuthConfig {
    pub fn access_ttl(&self) -> Duration {
        Duration::minutes(self.jwt_access_ttl_minutes as i64)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::hours(self.jwt_refresh_ttl_hours as i64)
    }

    /// True while the signing key is still the shipped placeholder.
    pub fn uses_placeholder_secret(&self) -> bool {
        self.jwt_secret == PLACEHOLDER_JWT_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: PLACEHOLDER_JWT_SECRET.to_string(),
            jwt_access_ttl_minutes: 30,
            jwt_refresh_ttl_hours: 24 * 7,
            password_min_length: 8,
            password_min_score: 2,
        }
    }
}
