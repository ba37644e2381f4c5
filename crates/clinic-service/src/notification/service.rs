//! The signed-in user's notification inbox.
//!
//! Every query is scoped to `ctx.user_id`; another user's notification id
//! behaves exactly like an unknown one.

use std::sync::Arc;

use uuid::Uuid;

use clinic_core::error::AppError;
use clinic_core::types::pagination::{PageRequest, PageResponse};
use clinic_database::repositories::NotificationRepository;
use clinic_entity::notification::Notification;

use crate::context::RequestContext;

#[derive(Debug, Clone)]
pub struct NotificationService {
    repo: Arc<NotificationRepository>,
}

impl NotificationService {
    pub fn new(repo: Arc<NotificationRepository>) -> Self {
        Self { repo }
    }

    /// Newest first.
    pub async fn inbox(
        &self,
        ctx: &RequestContext,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<PageResponse<Notification>, AppError> {
        self.repo.find_by_user(ctx.user_id, unread_only, &page).await
    }

    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<i64, AppError> {
        self.repo.count_unread(ctx.user_id).await
    }

    pub async fn mark_read(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        match self.repo.mark_read(id, ctx.user_id).await? {
            true => Ok(()),
            false => Err(AppError::not_found(format!("Notification {id} not found"))),
        }
    }

    /// Returns how many were unread.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        self.repo.mark_all_read(ctx.user_id).await
    }
}
