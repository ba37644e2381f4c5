//! JWT token validation and blocklist checking.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;
use uuid::Uuid;

use clinic_cache::{CacheManager, keys};
use clinic_core::config::auth::AuthConfig;
use clinic_core::error::{AppError, codes};
use clinic_core::traits::CacheProvider;

use super::claims::{Claims, TokenType};

/// Validates JWT tokens and checks blocklist status.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
    cache: CacheManager,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

fn unauthenticated(message: impl Into<String>) -> AppError {
    AppError::authentication(message).with_code(codes::INVALID_TOKEN)
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig, cache: CacheManager) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            cache,
        }
    }

    /// Decodes and validates an access token string.
    pub async fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_typed(token, TokenType::Access).await
    }

    /// Decodes and validates a refresh token string.
    pub async fn decode_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_typed(token, TokenType::Refresh).await
    }

    async fn decode_typed(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if claims.token_type != expected {
            return Err(unauthenticated(format!(
                "Invalid token type: expected {expected:?} token"
            )));
        }

        self.check_blocklist(claims.jti).await?;
        Ok(claims)
    }

    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    unauthenticated("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    unauthenticated("Invalid token signature")
                }
                _ => {
                    debug!(error = %e, "Token validation failed");
                    unauthenticated("Invalid token")
                }
            })
    }

    async fn check_blocklist(&self, jti: Uuid) -> Result<(), AppError> {
        // Cache failures do not lock everyone out.
        let blocked = self
            .cache
            .exists(&keys::jwt_blocklist(jti))
            .await
            .unwrap_or(false);
        if blocked {
            return Err(unauthenticated("Token has been revoked"));
        }
        Ok(())
    }

    /// Revoke a token until it would have expired anyway.
    pub async fn blocklist(&self, claims: &Claims) -> Result<(), AppError> {
        let ttl = Duration::from_secs(claims.remaining_ttl_seconds().max(60));
        self.cache
            .set(&keys::jwt_blocklist(claims.jti), "revoked", ttl)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use chrono::Utc;
    use clinic_core::config::cache::CacheConfig;
    use clinic_entity::user::{User, UserRole, UserStatus};

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ece@student.edu.tr".into(),
            password_hash: String::new(),
            full_name: "Ece Yılmaz".into(),
            institution_number: Some("2021123".into()),
            phone: None,
            department: None,
            role: UserRole::Student,
            status: UserStatus::Active,
            email_verified: true,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn pair() -> (JwtEncoder, JwtDecoder) {
        let config = AuthConfig::default();
        let cache = CacheManager::new(&CacheConfig::default());
        (JwtEncoder::new(&config), JwtDecoder::new(&config, cache))
    }

    #[tokio::test]
    async fn test_round_trip_access_token() {
        let (encoder, decoder) = pair();
        let user = user();
        let tokens = encoder.generate_token_pair(&user).unwrap();

        let claims = decoder.decode_access_token(&tokens.access_token).await.unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, UserRole::Student);
    }

    #[tokio::test]
    async fn test_token_type_is_enforced() {
        let (encoder, decoder) = pair();
        let tokens = encoder.generate_token_pair(&user()).unwrap();

        let err = decoder.decode_access_token(&tokens.refresh_token).await.unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_TOKEN);
        assert!(decoder.decode_refresh_token(&tokens.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_revoked_token_rejected() {
        let (encoder, decoder) = pair();
        let tokens = encoder.generate_token_pair(&user()).unwrap();
        let claims = decoder.decode_access_token(&tokens.access_token).await.unwrap();

        decoder.blocklist(&claims).await.unwrap();
        assert!(decoder.decode_access_token(&tokens.access_token).await.is_err());
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let (_, decoder) = pair();
        let err = decoder.decode_access_token("not.a.jwt").await.unwrap_err();
        assert_eq!(err.kind, clinic_core::error::ErrorKind::Authentication);
    }
}
