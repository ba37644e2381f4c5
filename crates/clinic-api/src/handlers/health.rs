//! Health check handler.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use tracing::warn;

use clinic_database::connection::health_check;

use crate::dto::ApiResponse;
use crate::dto::response::HealthResponse;
use crate::state::AppState;

const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database_ok = match tokio::time::timeout(DB_CHECK_TIMEOUT, health_check(&state.db_pool)).await {
        Ok(Ok(ok)) => ok,
        Ok(Err(e)) => {
            warn!(error = %e, "Database health check failed");
            false
        }
        Err(_) => {
            warn!("Database health check timed out");
            false
        }
    };

    Json(ApiResponse::ok(HealthResponse {
        status: if database_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if database_ok { "connected" } else { "unavailable" }.to_string(),
    }))
}
