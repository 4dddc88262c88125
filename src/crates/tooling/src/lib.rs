//! Shared tooling for the sciassist workspace
//!
//! # Modules
//!
//! - `config` - Environment-variable configuration source used to overlay
//!   file-based settings and pick up credentials
//! - `logging` - Tracing subscriber setup, timing helpers and log sanitising

pub mod config;
pub mod logging;

use thiserror::Error;

/// Errors that can occur in the tooling crate
#[derive(Debug, Error)]
pub enum ToolingError {
    /// An environment variable was present but unusable
    #[error("Environment variable {key}: {message}")]
    Env { key: String, message: String },

    /// The global tracing subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Result type for tooling operations
pub type Result<T> = std::result::Result<T, ToolingError>;

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
