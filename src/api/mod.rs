//! API Routes for Dropview
//!
//! This module combines all API routes into a single router.

pub mod status;
pub mod upload;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tower_http::services::ServeDir;

use crate::AppState;

/// Build the complete API router.
///
/// Route structure:
/// - /, /upload - Upload form and upload handler
/// - /health, /health/ready - Health checks
/// - {download_base_path}/* - Stored files, when `serve_uploads` is on
pub fn routes(state: AppState) -> Router<AppState> {
    let config = &state.config;

    let router = Router::new()
        .merge(status::routes())
        .merge(upload::routes(config.max_upload_size));

    if !config.serve_uploads {
        return router;
    }

    if config.download_base_path == "/" {
        tracing::warn!(
            "Not serving uploads at the site root; set DOWNLOAD_BASE_PATH to a sub-path"
        );
        return router;
    }

    let downloads = Router::new()
        .nest_service(
            &config.download_base_path,
            ServeDir::new(&config.upload_dir),
        )
        .layer(middleware::from_fn(hide_dot_files));

    router.merge(downloads)
}

/// 404 for any path segment starting with `.`, which covers in-flight
/// `.upload.*.part` files.
async fn hide_dot_files(request: Request, next: Next) -> Response {
    if has_dot_segment(request.uri().path()) {
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

/// Checks both raw and percent-decoded segments, so `%2E` cannot slip by.
fn has_dot_segment(path: &str) -> bool {
    path.split('/').any(|segment| {
        let decoded = urlencoding::decode(segment)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| segment.to_string());
        segment.starts_with('.') || decoded.starts_with('.')
    })
}
