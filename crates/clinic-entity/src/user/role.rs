//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Business classification of a user account.
///
/// The role is fixed at creation and drives every authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Enrolled student (patient).
    Student,
    /// Physician working at the clinic.
    Doctor,
    /// Non-physician staff who triage and assign requests.
    ClinicalStaff,
    /// University faculty or staff member (patient).
    AcademicStaff,
    /// Clinic administrator.
    Admin,
    /// System owner; may manage administrators.
    Superadmin,
}

impl UserRole {
    /// Every role, in declaration order.
    pub const ALL: [UserRole; 6] = [
        Self::Student,
        Self::Doctor,
        Self::ClinicalStaff,
        Self::AcademicStaff,
        Self::Admin,
        Self::Superadmin,
    ];

    /// Roles that book appointments for themselves.
    pub fn is_patient(&self) -> bool {
        matches!(self, Self::Student | Self::AcademicStaff)
    }

    /// Clinic-side roles that handle appointments.
    pub fn is_clinic_staff(&self) -> bool {
        matches!(self, Self::Doctor | Self::ClinicalStaff)
    }

    /// Check if this role is an admin or superadmin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin | Self::Superadmin)
    }

    /// Roles that may register themselves without an administrator.
    pub fn can_self_register(&self) -> bool {
        self.is_patient()
    }

    /// Return the role as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Doctor => "doctor",
            Self::ClinicalStaff => "clinical_staff",
            Self::AcademicStaff => "academic_staff",
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = clinic_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "doctor" => Ok(Self::Doctor),
            "clinical_staff" => Ok(Self::ClinicalStaff),
            "academic_staff" => Ok(Self::AcademicStaff),
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::Superadmin),
            _ => Err(clinic_core::AppError::invalid_field(
                "role",
                format!(
                    "Invalid user role: '{s}'. Expected one of: student, doctor, clinical_staff, academic_staff, admin, superadmin"
                ),
            )),
        }
    }
}
