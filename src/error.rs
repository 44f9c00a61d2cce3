//! Error types for Dropview.
//!
//! Uses thiserror for ergonomic error definitions that integrate
//! with axum's response system. Every error renders as a complete
//! HTML page so the browser that submitted the form always gets a
//! readable result.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::services::preview::{escape_html, render_document};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The form carried no `uploaded_file` part, or the part had no filename.
    #[error("No file uploaded.")]
    NoFileUploaded,

    #[error("Error saving file: {0}")]
    StorageWriteFailed(#[source] std::io::Error),

    #[error("Can't open saved file: {0}")]
    StorageReadFailed(#[source] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: max {max_size} bytes")]
    FileTooLarge { max_size: usize },
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400
            Self::NoFileUploaded | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,

            // 413
            Self::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,

            // 500
            Self::StorageWriteFailed(_) | Self::StorageReadFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoFileUploaded => "NO_FILE_UPLOADED",
            Self::StorageWriteFailed(_) => "STORAGE_WRITE_FAILED",
            Self::StorageReadFailed(_) => "STORAGE_READ_FAILED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
        }
    }

    /// HTML fragment describing the failure, cause escaped.
    pub fn to_html_fragment(&self) -> String {
        match self {
            Self::NoFileUploaded => "<p><strong>No file uploaded.</strong></p>\n".to_string(),
            Self::StorageWriteFailed(e) => format!(
                "<p><strong>Error saving file:</strong> {}</p>\n",
                escape_html(&e.to_string())
            ),
            Self::StorageReadFailed(e) => format!(
                "<p><strong>Can't open saved file:</strong> {}</p>\n",
                escape_html(&e.to_string())
            ),
            Self::InvalidInput(msg) => format!(
                "<p><strong>Invalid upload:</strong> {}</p>\n",
                escape_html(msg)
            ),
            Self::FileTooLarge { max_size } => format!(
                "<p><strong>File too large:</strong> uploads are limited to {} bytes.</p>\n",
                max_size
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::NoFileUploaded => tracing::info!(code = self.error_code(), "Upload rejected"),
            Self::InvalidInput(_) | Self::FileTooLarge { .. } => {
                tracing::warn!(code = self.error_code(), error = %self, "Upload rejected")
            }
            _ => tracing::error!(code = self.error_code(), error = %self, "Upload failed"),
        }

        (status, Html(render_document(&self.to_html_fragment()))).into_response()
    }
}
