//! Health check and API fallback

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub environment: &'static str,
    pub version: &'static str,
}

/// GET /api/health - Liveness check (no authentication)
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        environment: state.config.environment.as_str(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Fallback for unknown /api paths
pub async fn api_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "API endpoint not found" })),
    )
}
