//! Liveness endpoint.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Liveness health check.
///
/// Returns "healthy" whenever the server is running. The catalog is loaded
/// before the listener binds, so there are no dependencies to check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
    })
}
