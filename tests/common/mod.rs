//! Common test utilities and helpers.

#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use dropview::api;
use dropview::config::UploadConfig;
use dropview::AppState;
use tempfile::TempDir;

/// A running test app with its own upload directory.
pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: PathBuf,
    // Held so the directory outlives the server.
    _tmp: TempDir,
}

/// Build the router the binary serves, backed by `config`.
pub fn build_router(config: UploadConfig) -> Router {
    let state = AppState::new(config);
    Router::new()
        .merge(api::routes(state.clone()))
        .with_state(state)
}

/// Build a test app with default settings and a fresh upload directory.
pub fn build_test_app() -> TestApp {
    build_test_app_with(|_| {})
}

/// Build a test app, letting the caller adjust the config first.
pub fn build_test_app_with(adjust: impl FnOnce(&mut UploadConfig)) -> TestApp {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let upload_dir = tmp.path().join("uploads");

    let mut config = UploadConfig::with_upload_dir(&upload_dir);
    adjust(&mut config);
    let upload_dir = config.upload_dir.clone();

    let server = TestServer::new(build_router(config)).expect("Failed to create test server");

    TestApp {
        server,
        upload_dir,
        _tmp: tmp,
    }
}

/// Form with a single `uploaded_file` part.
pub fn file_form(file_name: &str, content: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "uploaded_file",
        Part::bytes(content.to_vec())
            .file_name(file_name)
            .mime_type("application/octet-stream"),
    )
}

/// Create a POST request with a raw body and content type
pub fn post_raw(uri: &str, content_type: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", content_type)
        .body(body.into())
        .unwrap()
}

/// Extract text body from response
pub async fn extract_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Names of files in the upload dir, sorted; empty if it does not exist.
pub fn stored_files(upload_dir: &std::path::Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(upload_dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
