//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;
use super::status::UserStatus;

/// A registered patient or staff member.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login email address (unique).
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Full name.
    pub full_name: String,
    /// Student or staff number.
    pub institution_number: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Faculty or department.
    pub department: Option<String>,
    /// Business role.
    pub role: UserRole,
    /// Account status.
    pub status: UserStatus,
    /// Whether the email address has been verified.
    pub email_verified: bool,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.status.is_active()
    }

    /// Check if this user is an active doctor who can take appointments.
    pub fn is_available_doctor(&self) -> bool {
        self.role == UserRole::Doctor && self.status.is_active()
    }

    /// Public projection of the user.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Compact user projection embedded in other responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID.
    pub id: Uuid,
    /// Full name.
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Role.
    pub role: UserRole,
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Full name.
    pub full_name: String,
    /// Student or staff number.
    pub institution_number: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Faculty or department.
    pub department: Option<String>,
    /// Assigned role.
    pub role: UserRole,
    /// Whether the email is already verified (admin-created accounts).
    pub email_verified: bool,
}
