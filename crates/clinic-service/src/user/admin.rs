//! Admin-only user management.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use clinic_auth::password::{PasswordHasher, PasswordValidator};
use clinic_core::error::{AppError, codes};
use clinic_core::types::pagination::{PageRequest, PageResponse};
use clinic_database::repositories::UserRepository;
use clinic_entity::user::{CreateUser, User, UserRole, UserStatus};

use super::guard::AccountStatuses;
use super::service::normalize_email;
use crate::context::RequestContext;

/// Data for creating an account of any role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStaffRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub institution_number: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub role: UserRole,
}

/// Admin-level user management.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    user_repo: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    statuses: AccountStatuses,
}

/// Whether `actor` may create or modify an account with `target` role.
pub(crate) fn can_manage(actor: UserRole, target: UserRole) -> bool {
    match actor {
        UserRole::Superadmin => true,
        UserRole::Admin => !target.is_admin(),
        _ => false,
    }
}

fn ensure_can_manage(ctx: &RequestContext, target: UserRole) -> Result<(), AppError> {
    if can_manage(ctx.role, target) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            codes::INSUFFICIENT_PERMISSIONS,
            format!("Role '{}' cannot manage '{target}' accounts", ctx.role),
        ))
    }
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        statuses: AccountStatuses,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            validator,
            statuses,
        }
    }

    /// Create an account. Admin-created accounts are pre-verified.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        req: CreateStaffRequest,
    ) -> Result<User, AppError> {
        ensure_can_manage(ctx, req.role)?;

        let email = normalize_email(&req.email);
        self.validator
            .validate(&req.password, &[email.as_str(), req.full_name.as_str()])?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let password_hash = self.hasher.hash_password(&req.password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                email,
                password_hash,
                full_name: req.full_name.trim().to_string(),
                institution_number: req.institution_number,
                phone: req.phone,
                department: req.department,
                role: req.role,
                email_verified: true,
            })
            .await?;

        info!(admin_id = %ctx.user_id, user_id = %user.id, role = %user.role, "Admin created user");
        Ok(user)
    }

    /// List users, optionally filtered by role.
    pub async fn list_users(
        &self,
        role: Option<UserRole>,
        page: PageRequest,
    ) -> Result<PageResponse<User>, AppError> {
        self.user_repo.find_all(role, &page).await
    }

    /// Activate or deactivate an account.
    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        status: UserStatus,
    ) -> Result<User, AppError> {
        if user_id == ctx.user_id {
            return Err(AppError::validation("You cannot change your own status"));
        }

        let target = self.find(user_id).await?;
        ensure_can_manage(ctx, target.role)?;

        let user = self
            .user_repo
            .update_status(user_id, status)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        self.statuses.invalidate(user_id).await?;

        info!(admin_id = %ctx.user_id, user_id = %user_id, status = ?status, "User status changed");
        Ok(user)
    }

    /// Mark an account's email as verified.
    pub async fn verify_user(&self, ctx: &RequestContext, user_id: Uuid) -> Result<User, AppError> {
        let user = self
            .user_repo
            .mark_verified(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(admin_id = %ctx.user_id, user_id = %user_id, "User verified");
        Ok(user)
    }

    async fn find(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_superadmin_manages_admins() {
        assert!(can_manage(UserRole::Superadmin, UserRole::Admin));
        assert!(!can_manage(UserRole::Admin, UserRole::Admin));
        assert!(!can_manage(UserRole::Admin, UserRole::Superadmin));
        assert!(can_manage(UserRole::Admin, UserRole::Doctor));
        assert!(!can_manage(UserRole::Doctor, UserRole::Student));
    }
}
