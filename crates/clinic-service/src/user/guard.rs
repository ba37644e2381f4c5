//! Account status checks for callers holding a still-valid token.
//!
//! Access tokens outlive an admin's decision to deactivate an account, so
//! every authenticated request asks [`AccountGuard`] whether the account is
//! still active. Statuses are served from the cache for a short TTL and
//! dropped whenever an admin changes them.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use clinic_cache::{CacheManager, keys};
use clinic_core::error::{AppError, codes};
use clinic_core::result::AppResult;
use clinic_core::traits::cache::CacheProvider;
use clinic_database::repositories::UserRepository;
use clinic_entity::user::UserStatus;

/// Read-through cache of account statuses keyed by user id.
#[derive(Debug, Clone)]
pub struct AccountStatuses {
    cache: CacheManager,
    ttl: Duration,
}

impl AccountStatuses {
    pub fn new(cache: CacheManager, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Cached status of `user_id`, or the result of `loader` cached for the
    /// configured TTL. Unknown users (`None`) are not cached.
    pub async fn get<F, Fut>(&self, user_id: Uuid, loader: F) -> AppResult<Option<UserStatus>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Option<UserStatus>>>,
    {
        let key = keys::user_status(user_id);

        if let Some(status) = self.cache.fetch_json::<UserStatus>(&key).await? {
            return Ok(Some(status));
        }

        let loaded = loader().await?;
        if let Some(status) = &loaded {
            self.cache.put_json(&key, status, self.ttl).await?;
        }
        Ok(loaded)
    }

    /// Forget the cached status of `user_id`.
    pub async fn invalidate(&self, user_id: Uuid) -> AppResult<()> {
        debug!(user_id = %user_id, "Invalidating cached account status");
        self.cache.delete(&keys::user_status(user_id)).await
    }
}

/// Turn a looked-up status into an access decision.
pub fn require_active(status: Option<UserStatus>) -> AppResult<()> {
    match status {
        Some(status) if status.is_active() => Ok(()),
        Some(_) => Err(AppError::forbidden(
            codes::ACCOUNT_INACTIVE,
            "This account has been deactivated",
        )),
        None => Err(AppError::authentication("User no longer exists")),
    }
}

/// Per-request check that the token's account is still active.
#[derive(Debug, Clone)]
pub struct AccountGuard {
    user_repo: Arc<UserRepository>,
    statuses: AccountStatuses,
}

impl AccountGuard {
    pub fn new(user_repo: Arc<UserRepository>, statuses: AccountStatuses) -> Self {
        Self {
            user_repo,
            statuses,
        }
    }

    /// Fail with `ACCOUNT_INACTIVE` once `user_id` has been deactivated.
    pub async fn ensure_active(&self, user_id: Uuid) -> AppResult<()> {
        let repo = Arc::clone(&self.user_repo);
        let status = self
            .statuses
            .get(user_id, move || async move {
                Ok::<_, AppError>(repo.find_by_id(user_id).await?.map(|user| user.status))
            })
            .await?;
        require_active(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_core::config::cache::CacheConfig;
    use clinic_core::error::ErrorKind;

    fn statuses() -> AccountStatuses {
        AccountStatuses::new(CacheManager::new(&CacheConfig::default()), Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_status_is_cached_until_invalidated() {
        let statuses = statuses();
        let user_id = Uuid::new_v4();

        let first = statuses
            .get(user_id, || async { Ok(Some(UserStatus::Active)) })
            .await
            .unwrap();
        assert_eq!(first, Some(UserStatus::Active));

        // Served from cache, the loader is not consulted.
        let cached = statuses
            .get(user_id, || async { Ok(Some(UserStatus::Inactive)) })
            .await
            .unwrap();
        assert_eq!(cached, Some(UserStatus::Active));

        statuses.invalidate(user_id).await.unwrap();
        let reloaded = statuses
            .get(user_id, || async { Ok(Some(UserStatus::Inactive)) })
            .await
            .unwrap();
        assert_eq!(reloaded, Some(UserStatus::Inactive));

        let err = require_active(reloaded).unwrap_err();
        assert_eq!(err.error_code(), codes::ACCOUNT_INACTIVE);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_cached() {
        let statuses = statuses();
        let user_id = Uuid::new_v4();

        let missing = statuses.get(user_id, || async { Ok(None) }).await.unwrap();
        assert_eq!(missing, None);

        let found = statuses
            .get(user_id, || async { Ok(Some(UserStatus::Active)) })
            .await
            .unwrap();
        assert_eq!(found, Some(UserStatus::Active));
    }

    #[test]
    fn test_require_active() {
        assert!(require_active(Some(UserStatus::Active)).is_ok());
        assert_eq!(
            require_active(None).unwrap_err().kind,
            ErrorKind::Authentication
        );
    }
}
