//! Password strength policy.

use clinic_core::config::auth::AuthConfig;
use clinic_core::error::AppError;

/// Enforces minimum length, character classes, and a zxcvbn score.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    min_score: u8,
}

impl PasswordValidator {
    /// Create a validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            min_score: config.password_min_score.min(4),
        }
    }

    /// Validate `password`; `user_inputs` (email, name) lower the score
    /// when the password reuses them.
    ///
    /// Every failed rule is reported under the `password` field.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> Result<(), AppError> {
        let mut problems = Vec::new();

        if password.chars().count() < self.min_length {
            problems.push(format!(
                "Password must be at least {} characters long",
                self.min_length
            ));
        }
        if !password.chars().any(|c| c.is_uppercase()) {
            problems.push("Password must contain an uppercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_lowercase()) {
            problems.push("Password must contain a lowercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            problems.push("Password must contain a digit".to_string());
        }

        if problems.is_empty() {
            let estimate = zxcvbn::zxcvbn(password, user_inputs);
            if (estimate.score() as u8) < self.min_score {
                let hint = estimate
                    .feedback()
                    .and_then(|f| f.warning().map(|w| w.to_string()))
                    .unwrap_or_else(|| "Password is too easy to guess".to_string());
                problems.push(hint);
            }
        }

        match problems.first() {
            None => Ok(()),
            Some(first) => Err(AppError::validation(first.clone())
                .with_details(serde_json::json!({ "password": problems }))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&AuthConfig::default())
    }

    #[test]
    fn test_short_password_reports_every_rule() {
        let err = validator().validate("abc", &[]).unwrap_err();
        let problems = err.details.unwrap()["password"].as_array().unwrap().len();
        assert_eq!(problems, 3);
    }

    #[test]
    fn test_common_password_rejected_by_score() {
        assert!(validator().validate("Password1", &[]).is_err());
    }

    #[test]
    fn test_reusing_email_lowers_score() {
        let v = PasswordValidator {
            min_length: 8,
            min_score: 3,
        };
        assert!(v.validate("Ecekaya2004", &["ecekaya2004@uni.edu.tr"]).is_err());
    }

    #[test]
    fn test_strong_password_accepted() {
        assert!(validator().validate("Lavender-Quartz-Orbit-91", &[]).is_ok());
    }
}
