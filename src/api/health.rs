//! Health check endpoint

use axum::response::Json;
use chrono::Utc;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status token, always "running"
    pub status: String,
    /// Current server time, RFC 3339
    pub time: String,
}

/// GET /health - Report service liveness
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running".to_string(),
        time: Utc::now().to_rfc3339(),
    })
}
