//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clinic_core::error::{AppError, codes};
use clinic_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the API extractor from verified JWT claims and passed into
/// service methods so every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's role at the time the JWT was issued.
    pub role: UserRole,
    /// The user's email (convenience field from JWT claims).
    pub email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, role: UserRole, email: String) -> Self {
        Self {
            user_id,
            role,
            email,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin or superadmin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns whether the current user books appointments for themselves.
    pub fn is_patient(&self) -> bool {
        self.role.is_patient()
    }

    /// Fail with `INSUFFICIENT_PERMISSIONS` unless the caller has one of `roles`.
    pub fn require_role(&self, roles: &[UserRole]) -> Result<(), AppError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::forbidden(
                codes::INSUFFICIENT_PERMISSIONS,
                format!("Role '{}' is not allowed to perform this operation", self.role),
            ))
        }
    }
}
