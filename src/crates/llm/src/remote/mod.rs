//! Remote LLM provider implementations.
//!
//! # Providers
//!
//! - **Gemini** - Google's Gemini models (Gemini 1.5 Pro, Flash)

pub mod gemini;

pub use gemini::GeminiClient;
