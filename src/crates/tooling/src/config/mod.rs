//! Configuration helpers
//!
//! Settings are read from a file first and then overlaid with environment
//! variables. `EnvSource` is the overlay half: it reads prefixed variables
//! (`SCIASSIST_SERVER_PORT`) as well as bare, well-known names such as
//! `GOOGLE_API_KEY`.
//!
//! # Example
//!
//! ```rust,ignore
//! use tooling::config::EnvSource;
//!
//! let env = EnvSource::new("SCIASSIST_");
//! if let Some(port) = env.parse::<u16>("server_port")? {
//!     config.server.port = port;
//! }
//! let api_key = EnvSource::bare().string("GOOGLE_API_KEY")?;
//! ```

mod env;

pub use env::{get_env, get_env_parse, EnvSource};
