//! Dropview - upload a file, keep it, look at it.
//!
//! Library exports for testing and external use.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;

pub use error::{Error, Result};
pub use state::AppState;
