//! Self-service account operations: register, login, refresh, logout.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use clinic_auth::jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair};
use clinic_auth::password::{PasswordHasher, PasswordValidator};
use clinic_core::error::{AppError, codes};
use clinic_database::repositories::UserRepository;
use clinic_entity::user::{CreateUser, User, UserRole};

use crate::context::RequestContext;

/// Data for a patient self-registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Full name.
    pub full_name: String,
    /// Student or staff number.
    pub institution_number: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Faculty or department.
    pub department: Option<String>,
    /// `student` or `academic_staff`.
    pub role: UserRole,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Issued tokens.
    #[serde(flatten)]
    pub tokens: TokenPair,
    /// The logged-in user.
    pub user: User,
}

/// Handles registration and the token lifecycle.
#[derive(Debug, Clone)]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
}

/// Normalized form used for storage and lookup.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> AppError {
    AppError::authentication("Invalid email or password").with_code(codes::INVALID_CREDENTIALS)
}

/// Deactivated accounts can neither sign in nor refresh their tokens.
fn ensure_can_login(user: &User) -> Result<(), AppError> {
    if user.can_login() {
        Ok(())
    } else {
        Err(AppError::forbidden(
            codes::ACCOUNT_INACTIVE,
            "This account has been deactivated",
        ))
    }
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            validator,
            encoder,
            decoder,
        }
    }

    /// Register a new patient account. It starts active and unverified.
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AppError> {
        if !req.role.can_self_register() {
            return Err(AppError::invalid_field(
                "role",
                "Only students and academic staff can register themselves",
            ));
        }

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
                email_verified: false,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Authenticate with email and password and issue a token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(invalid_credentials)?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(invalid_credentials());
        }

        ensure_can_login(&user)?;

        self.user_repo.update_last_login(user.id).await?;
        let tokens = self.encoder.generate_token_pair(&user)?;

        info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(LoginResponse { tokens, user })
    }

    /// Exchange a refresh token for a new pair. The old refresh token is
    /// revoked.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.decoder.decode_refresh_token(refresh_token).await?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::authentication("User no longer exists"))?;

        ensure_can_login(&user)?;

        self.decoder.blocklist(&claims).await?;
        self.encoder.generate_token_pair(&user)
    }

    /// Revoke the current access token and, if given, the refresh token.
    pub async fn logout(
        &self,
        access_claims: &Claims,
        refresh_token: Option<&str>,
    ) -> Result<(), AppError> {
        self.decoder.blocklist(access_claims).await?;

        if let Some(token) = refresh_token {
            match self.decoder.decode_refresh_token(token).await {
                Ok(claims) if claims.sub == access_claims.sub => {
                    self.decoder.blocklist(&claims).await?
                }
                Ok(_) => warn!(user_id = %access_claims.sub, "Refresh token belongs to another user"),
                Err(e) => warn!(user_id = %access_claims.sub, error = %e, "Ignoring unusable refresh token on logout"),
            }
        }

        info!(user_id = %access_claims.sub, "User logged out");
        Ok(())
    }

    /// The current user's account.
    pub async fn me(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_entity::user::UserStatus;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ece.Kaya@Uni.EDU.tr "), "ece.kaya@uni.edu.tr");
    }

    fn user(status: UserStatus) -> User {
        let now = chrono::Utc::now();
        User {
            id: uuid::Uuid::new_v4(),
            email: "dr.aksoy@university.edu.tr".into(),
            password_hash: String::new(),
            full_name: "Mert Aksoy".into(),
            institution_number: None,
            phone: None,
            department: Some("Internal Medicine".into()),
            role: UserRole::Doctor,
            status,
            email_verified: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_inactive_account_cannot_log_in() {
        assert!(ensure_can_login(&user(UserStatus::Active)).is_ok());

        let err = ensure_can_login(&user(UserStatus::Inactive)).unwrap_err();
        assert_eq!(err.error_code(), codes::ACCOUNT_INACTIVE);
        assert_eq!(err.kind.status_code().as_u16(), 403);
    }

    #[test]
    fn test_invalid_credentials_is_401_with_code() {
        let err = invalid_credentials();
        assert_eq!(err.kind.status_code().as_u16(), 401);
        assert_eq!(err.error_code(), codes::INVALID_CREDENTIALS);
    }
}
