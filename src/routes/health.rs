// src/routes/health.rs
use super::json_response;
use crate::client::HealthStatus;
use hyper::{Body, Response, StatusCode};

/// Liveness check. Always `{"status":"ok"}`.
pub fn health() -> Response<Body> {
    json_response(
        StatusCode::OK,
        &HealthStatus {
            status: "ok".to_string(),
        },
    )
}
