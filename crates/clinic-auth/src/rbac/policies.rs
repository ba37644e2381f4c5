//! Permission matrix per role.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use clinic_entity::user::UserRole;

/// Coarse capability checked before a service call.
///
/// Workflow actions are gated separately by the appointment action
/// catalogue; these permissions decide who may reach the endpoints at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Book an appointment for oneself.
    AppointmentBook,
    /// Read one's own appointments.
    AppointmentReadOwn,
    /// Read appointments assigned to oneself.
    AppointmentReadAssigned,
    /// Read every appointment.
    AppointmentReadAll,
    /// Take workflow actions on appointments.
    AppointmentAct,
    /// Write medical records.
    MedicalRecordWrite,
    /// Read any patient's medical records.
    MedicalRecordReadAny,
    /// Create, list, and update user accounts.
    UserManage,
    /// Create administrator accounts.
    AdminManage,
    /// Read and change system settings.
    SettingsManage,
    /// Trigger an academic calendar sync.
    CalendarSync,
    /// See clinic-wide statistics.
    StatisticsView,
}

/// Role → permission set mapping.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    policies: HashMap<UserRole, HashSet<Permission>>,
}

impl RbacPolicies {
    /// Build the default clinic policy matrix.
    pub fn new() -> Self {
        use Permission::*;

        let patient: HashSet<Permission> = [AppointmentBook, AppointmentReadOwn].into();
        let doctor: HashSet<Permission> = [
            AppointmentReadAssigned,
            AppointmentAct,
            MedicalRecordWrite,
            MedicalRecordReadAny,
        ]
        .into();
        let clinical_staff: HashSet<Permission> = [
            AppointmentReadAll,
            AppointmentAct,
            MedicalRecordReadAny,
            StatisticsView,
        ]
        .into();
        let admin: HashSet<Permission> = [
            AppointmentReadAll,
            MedicalRecordReadAny,
            UserManage,
            SettingsManage,
            CalendarSync,
            StatisticsView,
        ]
        .into();
        let mut superadmin = admin.clone();
        superadmin.insert(AdminManage);

        let policies = HashMap::from([
            (UserRole::Student, patient.clone()),
            (UserRole::AcademicStaff, patient),
            (UserRole::Doctor, doctor),
            (UserRole::ClinicalStaff, clinical_staff),
            (UserRole::Admin, admin),
            (UserRole::Superadmin, superadmin),
        ]);

        Self { policies }
    }

    /// Whether `role` holds `permission`.
    pub fn allows(&self, role: UserRole, permission: Permission) -> bool {
        self.policies
            .get(&role)
            .is_some_and(|set| set.contains(&permission))
    }

    /// All permissions held by `role`.
    pub fn permissions_for(&self, role: UserRole) -> Vec<Permission> {
        self.policies
            .get(&role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
