//! Authenticating `/ws` upgrades.
//!
//! Browsers cannot set an `Authorization` header on a WebSocket handshake,
//! so the access token travels as `?token=`.

use uuid::Uuid;

use clinic_auth::jwt::JwtDecoder;
use clinic_core::error::AppError;
use clinic_entity::user::UserRole;

/// Identity a socket subscribes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedConnection {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Validate the access token sent with a handshake.
///
/// Runs before the upgrade so a rejected client gets a normal JSON error.
pub async fn authenticate_socket(
    decoder: &JwtDecoder,
    token: Option<&str>,
) -> Result<AuthenticatedConnection, AppError> {
    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::authentication("Missing token query parameter"))?;

    let claims = decoder.decode_access_token(token).await?;
    Ok(AuthenticatedConnection {
        user_id: claims.user_id(),
        role: claims.role,
    })
}
