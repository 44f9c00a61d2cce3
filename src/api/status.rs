//! Status Routes
//!
//! Health checks.
//!
//! Routes:
//! - GET /health - Basic health check
//! - GET /health/ready - Readiness check (upload directory usable)

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Build status routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
}

/// Health check response.
///
/// `status` is always `"healthy"`: a process that can answer is alive.
/// Dependency problems surface on `/health/ready` instead.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub upload_dir: String,
    pub message: Option<String>,
}

/// Basic health check.
///
/// GET /health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Readiness check: the upload directory exists or can be created.
///
/// GET /health/ready
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let upload_dir = state.store.dir().display().to_string();

    match state.store.ensure_dir().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                ready: true,
                upload_dir,
                message: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(upload_dir = %upload_dir, error = %e, "Upload directory unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    ready: false,
                    upload_dir,
                    message: Some(e.to_string()),
                }),
            )
        }
    }
}
