//! Language-model clients for sciassist.
//!
//! The orchestrator only needs one capability from a hosted model: send a
//! prompt, get text back. That capability is the [`TextModel`] trait. Every
//! failure (network, authentication, quota, malformed response) comes back
//! as an [`LlmError`] so callers can tell an answer from a failure without
//! inspecting the text.
//!
//! # Remote Providers
//!
//! - **Gemini** - Google's Gemini models via the `generateContent` REST API
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::{RemoteLlmConfig, TextModel};
//! use llm::remote::GeminiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RemoteLlmConfig::from_env(
//!         "GOOGLE_API_KEY",
//!         "https://generativelanguage.googleapis.com/v1beta",
//!         "gemini-1.5-pro",
//!     )?;
//!     let client = GeminiClient::new(config)?;
//!
//!     let text = client.generate("Generate code for: plot sine function").await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod remote;

pub use config::RemoteLlmConfig;
pub use error::{LlmError, Result};
pub use model::TextModel;

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
