//! RBAC enforcement helpers.

use std::sync::Arc;

use clinic_core::error::{AppError, codes};
use clinic_entity::user::UserRole;

use super::policies::{Permission, RbacPolicies};

/// Checks permissions against the policy matrix.
#[derive(Debug, Clone)]
pub struct RbacEnforcer {
    policies: Arc<RbacPolicies>,
}

impl RbacEnforcer {
    /// Create an enforcer over `policies`.
    pub fn new(policies: RbacPolicies) -> Self {
        Self {
            policies: Arc::new(policies),
        }
    }

    /// Fail with `INSUFFICIENT_PERMISSIONS` unless `role` holds `permission`.
    pub fn require_permission(&self, role: UserRole, permission: Permission) -> Result<(), AppError> {
        if self.has_permission(role, permission) {
            Ok(())
        } else {
            Err(AppError::forbidden(
                codes::INSUFFICIENT_PERMISSIONS,
                format!("Role '{role}' lacks permission '{permission:?}'"),
            ))
        }
    }

    /// Whether `role` holds `permission`.
    pub fn has_permission(&self, role: UserRole, permission: Permission) -> bool {
        self.policies.allows(role, permission)
    }

    /// Fail with `INSUFFICIENT_PERMISSIONS` unless `role` is one of `roles`.
    pub fn require_role(&self, role: UserRole, roles: &[UserRole]) -> Result<(), AppError> {
        if roles.contains(&role) {
            Ok(())
        } else {
            Err(AppError::forbidden(
                codes::INSUFFICIENT_PERMISSIONS,
                format!("Role '{role}' is not allowed to perform this operation"),
            ))
        }
    }
}

impl Default for RbacEnforcer {
    fn default() -> Self {
        Self::new(RbacPolicies::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patients_book_but_do_not_act() {
        let rbac = RbacEnforcer::default();
        for role in [UserRole::Student, UserRole::AcademicStaff] {
            assert!(rbac.has_permission(role, Permission::AppointmentBook));
            assert!(!rbac.has_permission(role, Permission::AppointmentAct));
        }
    }

    #[test]
    fn test_only_admins_sync_calendar() {
        let rbac = RbacEnforcer::default();
        for role in UserRole::ALL {
            assert_eq!(
                rbac.has_permission(role, Permission::CalendarSync),
                role.is_admin(),
                "{role}"
            );
        }
    }

    #[test]
    fn test_denial_code() {
        let err = RbacEnforcer::default()
            .require_permission(UserRole::Doctor, Permission::SettingsManage)
            .unwrap_err();
        assert_eq!(err.error_code(), codes::INSUFFICIENT_PERMISSIONS);
        assert_eq!(err.kind.status_code().as_u16(), 403);
    }

    #[test]
    fn test_superadmin_manages_admins() {
        let rbac = RbacEnforcer::default();
        assert!(rbac.has_permission(UserRole::Superadmin, Permission::AdminManage));
        assert!(!rbac.has_permission(UserRole::Admin, Permission::AdminManage));
    }
}
