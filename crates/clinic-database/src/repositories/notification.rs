//! Notification repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use clinic_core::error::{AppError, ErrorKind};
use clinic_core::result::AppResult;
use clinic_core::types::pagination::{PageRequest, PageResponse};
use clinic_entity::notification::{CreateNotification, Notification};

/// Repository for notification records.
///
/// Listing and unread counts only consider `in_app` rows; the other
/// delivery methods are delivery receipts.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a notification by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find notification", e)
            })
    }

    /// List a user's in-app notifications, newest first.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND delivery_method = 'in_app' \
             AND (NOT $2 OR status <> 'read')",
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
        })?;

        let items = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 AND delivery_method = 'in_app' \
             AND (NOT $2 OR status <> 'read') \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))?;

        Ok(PageResponse::new(items, *page, total as u64))
    }

    /// Count unread in-app notifications.
    pub async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE user_id = $1 AND delivery_method = 'in_app' AND status <> 'read'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    /// Create a notification in `pending`.
    pub async fn create(&self, data: &CreateNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, category, delivery_method, title, message, payload) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.category)
        .bind(data.delivery_method)
        .bind(&data.title)
        .bind(&data.message)
        .bind(&data.payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    /// Mark a notification as delivered.
    pub async fn mark_sent(&self, id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE notifications SET status = 'sent', sent_at = NOW(), error = NULL \
             WHERE id = $1 AND status IN ('pending', 'failed')",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark sent", e))?;
        Ok(())
    }

    /// Record a delivery failure.
    pub async fn mark_failed(&self, id: Uuid, error: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE notifications SET status = 'failed', error = $2 \
             WHERE id = $1 AND status IN ('pending', 'failed')",
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark failed", e))?;
        Ok(())
    }

    /// Mark one of the user's notifications as read. False when the user owns no such row.
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET status = 'read', read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all of the user's in-app notifications as read.
    pub async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET status = 'read', read_at = NOW() \
             WHERE user_id = $1 AND delivery_method = 'in_app' AND status <> 'read'",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    /// Delete read or delivered notifications older than `before`.
    pub async fn delete_older_than(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE status IN ('read', 'sent') AND created_at < $1",
        )
        .bind(before)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clean up notifications", e)
        })?;
        Ok(result.rows_affected())
    }
}
