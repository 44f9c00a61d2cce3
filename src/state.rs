//! Application state for Dropview.
//!
//! Contains the shared state that is passed to all handlers.

use std::sync::Arc;

use crate::config::UploadConfig;
use crate::services::UploadStore;

/// Application state shared across all handlers.
///
/// Holds no per-request data; the upload directory on disk is the only
/// resource requests share.
#[derive(Clone)]
pub struct AppState {
    /// Upload settings, fixed at construction.
    pub config: Arc<UploadConfig>,
    /// Storage for uploaded files.
    pub store: UploadStore,
}

impl AppState {
    pub fn new(config: UploadConfig) -> Self {
        let store = UploadStore::new(config.upload_dir.clone(), config.copy_chunk_size);
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
