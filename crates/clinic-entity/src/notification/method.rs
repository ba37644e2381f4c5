//! Notification delivery method enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Channel a notification is delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "delivery_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    Email,
    Sms,
    Push,
    InApp,
}

impl DeliveryMethod {
    /// Return the method as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Push => "push",
            Self::InApp => "in_app",
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeliveryMethod {
    type Err = clinic_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" | "mail" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            "push" => Ok(Self::Push),
            "in_app" | "database" => Ok(Self::InApp),
            _ => Err(clinic_core::AppError::configuration(format!(
                "Unknown delivery method: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("in_app".parse::<DeliveryMethod>().unwrap(), DeliveryMethod::InApp);
        assert_eq!("EMAIL".parse::<DeliveryMethod>().unwrap(), DeliveryMethod::Email);
        assert!("pigeon".parse::<DeliveryMethod>().is_err());
    }
}
