//! Token payload shared by access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clinic_entity::user::{User, UserRole};

/// Registered claims plus the caller's role, which drives every workflow
/// and permission check without a user lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    /// Role at issuance. A role change takes effect on the next login.
    pub role: UserRole,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    /// Key for the revocation blocklist.
    pub jti: Uuid,
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    /// Only accepted by the refresh and logout endpoints.
    Refresh,
}

impl Claims {
    /// Fresh claims for `user` with a new `jti`.
    pub fn issue(
        user: &User,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user.id,
            role: user.role,
            email: user.email.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
            token_type,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Seconds until expiry, floored at zero.
    pub fn remaining_ttl_seconds(&self) -> u64 {
        u64::try_from(self.exp - Utc::now().timestamp()).unwrap_or(0)
    }
}
