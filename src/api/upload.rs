//! Upload Routes
//!
//! Accepts a single file from a browser form, stores it in the upload
//! directory and answers with an HTML page previewing what was stored.
//!
//! Routes:
//! - GET / - Upload form
//! - POST /upload - Store the `uploaded_file` part and render a preview
//!
//! The download link in the result page points at the configured base
//! path; this handler never serves stored files itself.

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Router,
};
use futures::TryStreamExt;

use crate::services::preview::{render_document, render_download_link, render_saved_summary};
use crate::services::{is_storable, sanitize, Preview};
use crate::{AppState, Error, Result};

/// Multipart field carrying the file.
pub const UPLOAD_FIELD: &str = "uploaded_file";

const UPLOAD_FORM: &str = "<!doctype html><html><head><meta charset='utf-8'>\
<title>Upload a file</title></head><body>\n\
<h2>Upload a file</h2>\n\
<form action='/upload' method='post' enctype='multipart/form-data'>\n\
<input type='file' name='uploaded_file'>\n\
<button type='submit'>Upload</button>\n\
</form>\n\
</body></html>\n";

/// Build upload routes.
///
/// `max_upload_size` replaces axum's default request body limit for the
/// upload route only.
pub fn routes(max_upload_size: usize) -> Router<AppState> {
    Router::new().route("/", get(upload_form)).route(
        "/upload",
        post(upload_and_show).layer(DefaultBodyLimit::max(max_upload_size)),
    )
}

/// Serve the upload form.
///
/// GET /
async fn upload_form() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}

/// Store an uploaded file and render its contents.
///
/// POST /upload
///
/// Accepts multipart/form-data; only the first `uploaded_file` part is
/// used and every other field is ignored. The file is fully written
/// before a bounded prefix is read back for the preview.
#[axum::debug_handler]
async fn upload_and_show(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>> {
    let config = &state.config;
    let max_upload_size = config.max_upload_size;

    let field = loop {
        match multipart
            .next_field()
            .await
            .map_err(|e| field_error(e, max_upload_size))?
        {
            Some(field) if field.name() == Some(UPLOAD_FIELD) => break field,
            Some(_) => continue,
            None => return Err(Error::NoFileUploaded),
        }
    };

    let original_name = upload_file_name(&field).ok_or(Error::NoFileUploaded)?;
    let safe_name = sanitize(&original_name);
    if !is_storable(&safe_name) {
        return Err(Error::InvalidInput(format!(
            "File name {:?} does not name a file",
            original_name
        )));
    }

    tracing::info!(
        original_name = %original_name,
        safe_name = %safe_name,
        "Receiving upload"
    );

    state.store.ensure_dir().await?;
    let chunks = field.map_err(move |e| chunk_error(e, max_upload_size));
    let stored = state.store.store(&safe_name, chunks).await?;

    let sample = state
        .store
        .read_sample(&stored, config.max_display_bytes.saturating_add(1))
        .await?;
    let preview = Preview::from_sample(&sample, config.max_display_bytes);

    tracing::info!(
        safe_name = %safe_name,
        size_bytes = stored.size_bytes,
        preview = preview_kind(&preview),
        "Upload stored"
    );

    let mut body = render_saved_summary(
        &safe_name,
        stored.size_bytes,
        &stored.path.display().to_string(),
    );
    body.push_str(&preview.to_html());
    body.push_str(&render_download_link(&config.download_base_path, &safe_name));

    Ok(Html(render_document(&body)))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Client filename of a file part, if it carries a non-empty one.
///
/// Browsers send `filename=""` when the file input was left empty.
fn upload_file_name(field: &Field<'_>) -> Option<String> {
    field
        .file_name()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Error while locating the file part; the body limit maps to 413.
fn field_error(err: MultipartError, max_upload_size: usize) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Error::FileTooLarge {
            max_size: max_upload_size,
        };
    }
    Error::InvalidInput(format!("Failed to read multipart field: {}", err.body_text()))
}

/// Error while streaming the file part.
///
/// Anything but the body limit (e.g. a client that went away) counts as a
/// failed write.
fn chunk_error(err: MultipartError, max_upload_size: usize) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Error::FileTooLarge {
            max_size: max_upload_size,
        };
    }
    Error::StorageWriteFailed(std::io::Error::new(std::io::ErrorKind::Other, err))
}

fn preview_kind(preview: &Preview) -> &'static str {
    match preview {
        Preview::Empty => "empty",
        Preview::Text { .. } => "text",
        Preview::Binary { .. } => "binary",
    }
}
