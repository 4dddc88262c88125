//! Scientific query dispatch and code-generation orchestration
//!
//! A query either asks for code (it mentions the routing keyword) or asks a
//! scientific question. The [`dispatcher::Dispatcher`] sends the first kind
//! through a few-shot prompt to a language model and the second kind to a
//! computation/knowledge service. Generated code can then be shipped to a
//! freshly provisioned VM whose size comes from a coarse task classification.
//!
//! External services sit behind traits so they can be swapped or mocked:
//! [`llm::TextModel`], [`lookup::ComputationClient`] and
//! [`provision::ComputeProvisioner`].

pub mod api;
pub mod classifier;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod dispatcher;
pub mod lookup;
pub mod notebook;
pub mod prompt;
pub mod provision;
pub mod version;

pub use classifier::{classify, ComputeTier, TaskClassification};
pub use codegen::{CodeGenerator, GeneratedCode};
pub use config::AppConfig;
pub use dispatcher::{Credentials, Deployment, DispatchOutcome, Dispatcher, Route};
pub use notebook::{AnalysisNotebook, LookupBatchNotebook};
pub use prompt::PromptBuilder;

use lookup::ComputationError;
use provision::ProvisionError;
use thiserror::Error;

/// Errors that can occur while serving a query
#[derive(Debug, Error)]
pub enum SciassistError {
    /// Code generation or debugging failed
    #[error("Language model call failed: {0}")]
    LanguageModel(#[from] llm::LlmError),

    /// Computation/knowledge lookup failed
    #[error("Computation lookup failed: {0}")]
    Computation(#[from] ComputationError),

    /// Compute instance creation failed
    #[error("Provisioning failed: {0}")]
    Provisioning(#[from] ProvisionError),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied unusable input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Coarse failure classes reported to operators and API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network, authentication, quota or malformed-response failure of a
    /// model or computation call
    NetworkOrAuth,
    /// Instance creation was rejected or never reached the provider
    Provisioning,
    /// Local configuration problem
    Configuration,
    /// Bad request from the caller
    InvalidInput,
}

impl SciassistError {
    /// Failure class of this error
    pub fn kind(&self) -> FailureKind {
        match self {
            SciassistError::LanguageModel(e) if !e.is_remote() => FailureKind::Configuration,
            SciassistError::Computation(ComputationError::Config(_)) => FailureKind::Configuration,
            SciassistError::LanguageModel(_) | SciassistError::Computation(_) => {
                FailureKind::NetworkOrAuth
            }
            SciassistError::Provisioning(_) => FailureKind::Provisioning,
            SciassistError::Config(_) => FailureKind::Configuration,
            SciassistError::InvalidInput(_) => FailureKind::InvalidInput,
        }
    }
}

impl From<tooling::ToolingError> for SciassistError {
    fn from(err: tooling::ToolingError) -> Self {
        SciassistError::Config(err.to_string())
    }
}

/// Result type for sciassist operations
pub type Result<T> = std::result::Result<T, SciassistError>;

/// Get version information
pub fn version() -> &'static str {
    version::VERSION
}
