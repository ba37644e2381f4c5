//! One access log line per request.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, error, info};

/// Probed every few seconds by the orchestrator.
const HEALTH_PATH: &str = "/api/health";

pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        error!(%method, %path, status, elapsed_ms, "Request failed");
    } else if path == HEALTH_PATH {
        debug!(status, elapsed_ms, "Health probe");
    } else {
        info!(%method, %path, status, elapsed_ms, "Request served");
    }

    response
}
