//! Permission guards called at the top of handlers.

use clinic_auth::rbac::Permission;
use clinic_core::error::{AppError, codes};

use crate::extractors::AuthUser;
use crate::state::AppState;

/// Fails with 403 `INSUFFICIENT_PERMISSIONS` unless the caller holds `permission`.
pub fn require_permission(
    state: &AppState,
    auth: &AuthUser,
    permission: Permission,
) -> Result<(), AppError> {
    state.rbac.require_permission(auth.role, permission)
}

/// Fails unless the caller holds at least one of `permissions`.
pub fn require_any(
    state: &AppState,
    auth: &AuthUser,
    permissions: &[Permission],
) -> Result<(), AppError> {
    if permissions
        .iter()
        .any(|p| state.rbac.has_permission(auth.role, *p))
    {
        return Ok(());
    }
    Err(AppError::forbidden(
        codes::INSUFFICIENT_PERMISSIONS,
        format!("Role '{}' may not access this resource", auth.role),
    ))
}
