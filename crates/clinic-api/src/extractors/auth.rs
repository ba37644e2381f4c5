//! `AuthUser` extractor: pulls the JWT from the Authorization header,
//! validates it, checks the account is still active, and injects the
//! request context.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use clinic_auth::jwt::Claims;
use clinic_core::error::AppError;
use clinic_service::context::RequestContext;

use crate::state::AppState;

/// Authenticated caller available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Context handed to services.
    pub ctx: RequestContext,
    /// Verified access-token claims, kept for logout.
    pub claims: Claims,
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

/// Token part of a `Bearer` Authorization header value.
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = bearer_token(header)
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = state.jwt_decoder.decode_access_token(token).await?;

        // Tokens stay valid after an admin deactivates the account
        state.account_guard.ensure_active(claims.user_id()).await?;

        let ctx = RequestContext::new(claims.user_id(), claims.role, claims.email.clone());

        Ok(AuthUser { ctx, claims })
    }
}
