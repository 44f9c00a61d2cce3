//! Configuration management for Dropview.
//!
//! Loads configuration from environment variables (and an optional `.env`
//! file). The resulting [`Config`] is built once in `main` and handed to
//! [`AppState`](crate::AppState); handlers never read the environment.

use std::env;
use std::path::PathBuf;

/// Default upload directory, relative to the working directory at startup.
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";

/// Default number of bytes rendered in a text preview.
pub const DEFAULT_MAX_DISPLAY_BYTES: usize = 200_000;

/// Default block size for streaming an upload to disk.
pub const DEFAULT_COPY_CHUNK_SIZE: usize = 65_536;

/// Default request body limit (100 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 100 * 1024 * 1024;

/// Number of leading bytes shown in a binary hex preview.
pub const HEX_PREVIEW_BYTES: usize = 256;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory uploads are written to (flat, created on demand).
    pub upload_dir: PathBuf,
    /// Text previews show at most this many bytes.
    pub max_display_bytes: usize,
    /// Writes to disk are issued in blocks of this size.
    pub copy_chunk_size: usize,
    /// Largest request body accepted by the upload route.
    pub max_upload_size: usize,
    /// URL prefix the download link points at.
    pub download_base_path: String,
    /// Mount a static file service for `upload_dir` at `download_base_path`.
    pub serve_uploads: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_display_bytes: DEFAULT_MAX_DISPLAY_BYTES,
            copy_chunk_size: DEFAULT_COPY_CHUNK_SIZE,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            download_base_path: "/uploads".to_string(),
            serve_uploads: true,
        }
    }
}

impl UploadConfig {
    /// Config rooted at `upload_dir` with every other value defaulted.
    pub fn with_upload_dir(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            ..Self::default()
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            server: ServerConfig {
                host: env_or("HOST", "0.0.0.0"),
                port: env_parse("PORT", 8080),
                log_json: env_or("LOG_FORMAT", "text").eq_ignore_ascii_case("json"),
            },
            upload: UploadConfig {
                upload_dir: PathBuf::from(env_or("UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
                max_display_bytes: env_parse("MAX_DISPLAY_BYTES", DEFAULT_MAX_DISPLAY_BYTES),
                copy_chunk_size: env_parse("COPY_CHUNK_SIZE", DEFAULT_COPY_CHUNK_SIZE).max(1),
                max_upload_size: env_parse("MAX_UPLOAD_SIZE", DEFAULT_MAX_UPLOAD_SIZE),
                download_base_path: normalize_base_path(&env_or("DOWNLOAD_BASE_PATH", "/uploads")),
                serve_uploads: env_or("SERVE_UPLOADS", "true").parse().unwrap_or(true),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Leading slash, no trailing slash: `uploads/` becomes `/uploads`.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    format!("/{}", trimmed)
}
