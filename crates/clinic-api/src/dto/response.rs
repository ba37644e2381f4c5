//! Response DTOs.

use serde::{Deserialize, Serialize};

use clinic_entity::appointment::AppointmentStatus;
use clinic_entity::appointment::action::ActionCatalogueEntry;
use clinic_entity::appointment::status::TransitionRow;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true`; failures go through `AppError`.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    pub version: String,
    /// `connected` or `unavailable`.
    pub database: String,
}

/// The workflow rules as published to frontends.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResponse {
    /// One row per status.
    pub transitions: Vec<TransitionRow>,
    /// Actions offered per (role, status).
    pub actions: Vec<ActionCatalogueEntry>,
}

/// Answer to a transition check.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionCheckResponse {
    pub from: AppointmentStatus,
    pub to: AppointmentStatus,
    pub allowed: bool,
}
