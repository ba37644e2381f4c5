//! Unified application error types.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The HTTP mapping lives here as well
//! so every handler can return `Result<_, AppError>` directly.

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable error codes attached to access-control and workflow
/// rejections.
pub mod codes {
    /// The caller's role is not offered the requested action.
    pub const ROLE_MISMATCH: &str = "ROLE_MISMATCH";
    /// The requested status change is not in the transition table.
    pub const INVALID_STATUS_TRANSITION: &str = "INVALID_STATUS_TRANSITION";
    /// A doctor tried to act on an appointment assigned to someone else.
    pub const NOT_ASSIGNED_DOCTOR: &str = "NOT_ASSIGNED_DOCTOR";
    /// The account has been deactivated.
    pub const ACCOUNT_INACTIVE: &str = "ACCOUNT_INACTIVE";
    /// The account's email address has not been verified.
    pub const EMAIL_NOT_VERIFIED: &str = "EMAIL_NOT_VERIFIED";
    /// Login failed.
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    /// The bearer token is missing, malformed, expired, or revoked.
    pub const INVALID_TOKEN: &str = "INVALID_TOKEN";
    /// The caller lacks a permission required by the endpoint.
    pub const INSUFFICIENT_PERMISSIONS: &str = "INSUFFICIENT_PERMISSIONS";
    /// The caller may only access their own records.
    pub const NOT_RESOURCE_OWNER: &str = "NOT_RESOURCE_OWNER";
    /// The requested date falls on a holiday that blocks booking.
    pub const DATE_BLOCKED: &str = "DATE_BLOCKED";
}

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found.
    NotFound,
    /// Authentication failed (invalid credentials, expired token, etc.).
    Authentication,
    /// The caller does not have permission to perform the action.
    Authorization,
    /// Input validation failed.
    Validation,
    /// A conflict occurred (duplicate entry, concurrent modification, etc.).
    Conflict,
    /// An internal server error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A cache error occurred.
    Cache,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An external service error occurred.
    ExternalService,
    /// The service is temporarily unavailable.
    ServiceUnavailable,
}

impl ErrorKind {
    /// HTTP status code for this kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Authentication => StatusCode::UNAUTHORIZED,
            Self::Authorization => StatusCode::FORBIDDEN,
            Self::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict => StatusCode::CONFLICT,
            Self::ExternalService => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal
            | Self::Database
            | Self::Cache
            | Self::Configuration
            | Self::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fallback `error_code` used when an error carries no specific code.
    pub fn default_code(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Authentication => "UNAUTHENTICATED",
            Self::Authorization => "FORBIDDEN",
            Self::Validation => "VALIDATION_FAILED",
            Self::Conflict => "CONFLICT",
            Self::ExternalService => "EXTERNAL_SERVICE_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Internal
            | Self::Database
            | Self::Cache
            | Self::Configuration
            | Self::Serialization => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Cache => write!(f, "CACHE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
            Self::ServiceUnavailable => write!(f, "SERVICE_UNAVAILABLE"),
        }
    }
}

/// The unified application error.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. `code` is the machine-readable
/// discriminator returned to clients; `details` carries field-level
/// validation messages.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Specific machine-readable code, overriding the kind default.
    pub code: Option<&'static str>,
    /// Structured details (e.g. `{field: [messages]}`).
    pub details: Option<serde_json::Value>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            details: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            details: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach a machine-readable error code.
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach structured details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// The `error_code` reported to clients.
    pub fn error_code(&self) -> &'static str {
        self.code.unwrap_or_else(|| self.kind.default_code())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create an authorization error carrying a specific code.
    pub fn forbidden(code: &'static str, message: impl Into<String>) -> Self {
        Self::authorization(message).with_code(code)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a validation error for a single field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let details = serde_json::json!({ field: [message.clone()] });
        Self::validation(message).with_details(details)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create a service-unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            code: self.code,
            details: self.details.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code.
    pub error_code: String,
    /// Human-readable message.
    pub message: String,
    /// Field-level messages or other details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        // Internal details are logged, never returned.
        let message = if status.is_server_error() && self.kind != ErrorKind::ServiceUnavailable {
            tracing::error!(kind = %self.kind, error = %self.message, "Internal server error");
            "An internal error occurred".to_string()
        } else {
            self.message.clone()
        };

        let body = ApiErrorResponse {
            success: false,
            error_code: self.error_code().to_string(),
            message,
            errors: self.details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_status_mapping() {
        assert_eq!(ErrorKind::Authentication.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::Authorization.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::Validation.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::Database.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_code_prefers_specific_code() {
        let err = AppError::forbidden(codes::ROLE_MISMATCH, "nope");
        assert_eq!(err.error_code(), "ROLE_MISMATCH");
        assert_eq!(AppError::authorization("nope").error_code(), "FORBIDDEN");
        assert_eq!(AppError::authentication("who").error_code(), "UNAUTHENTICATED");
    }

    #[test]
    fn test_invalid_field_details() {
        let err = AppError::invalid_field("reason", "A reason is required");
        assert_eq!(err.kind, ErrorKind::Validation);
        let details = err.details.expect("details");
        assert_eq!(details["reason"][0], "A reason is required");
    }

    #[test]
    fn test_clone_keeps_code() {
        let err = AppError::validation("bad").with_code(codes::INVALID_STATUS_TRANSITION);
        let cloned = err.clone();
        assert_eq!(cloned.error_code(), codes::INVALID_STATUS_TRANSITION);
        assert!(cloned.source.is_none());
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = AppError::forbidden(codes::ROLE_MISMATCH, "Doctors cannot review").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
