//! Computation/knowledge lookup
//!
//! Scientific questions that are not code requests go to a computation
//! service as-is. The service answers with text or fails with a
//! [`ComputationError`]; there are no retries.

pub mod wolfram;

pub use wolfram::WolframAlphaClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a computation lookup
#[derive(Debug, Error)]
pub enum ComputationError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials were rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The service understood the request but had no answer
    #[error("No answer for query: {0}")]
    NoAnswer(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Service-side failure
    #[error("Service error {status}: {message}")]
    Service { status: u16, message: String },

    /// Client could not be built from configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A service that answers free-text scientific queries
#[async_trait]
pub trait ComputationClient: Send + Sync {
    /// Answer `query`. One attempt per call.
    async fn query(&self, query: &str) -> Result<String, ComputationError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
