//! Service layer for Dropview.
//!
//! - Filename (client filename sanitizing)
//! - Classify (text/binary heuristic)
//! - Preview (HTML rendering of samples and result pages)
//! - UploadStore (streamed writes into the upload directory)

pub mod classify;
pub mod filename;
pub mod preview;
pub mod upload_store;

pub use classify::{classify, ContentKind};
pub use filename::{is_storable, sanitize};
pub use preview::Preview;
pub use upload_store::{StoredFile, UploadStore};
