//! Whether an account may sign in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Admins deactivate accounts instead of deleting them, so appointment and
/// medical record history keeps pointing at a real user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    /// Cannot sign in, and existing tokens fail on refresh.
    Inactive,
}

impl UserStatus {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let parsed: UserStatus = serde_json::from_str(r#""inactive""#).unwrap();
        assert_eq!(parsed, UserStatus::Inactive);
        assert!(!parsed.is_active());
        assert!(serde_json::from_str::<UserStatus>(r#""locked""#).is_err());
        assert_eq!(UserStatus::default().to_string(), "active");
    }
}
