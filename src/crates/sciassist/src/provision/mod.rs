//! Compute provisioning for generated code
//!
//! A provision call creates exactly one VM. The generated code is never
//! spliced into the startup script: it travels as its own instance-metadata
//! value (`generated-code`) and the fixed script downloads it from the
//! metadata server before running it.

pub mod gce;

pub use gce::{GceProvisioner, GceSettings};

use crate::classifier::ComputeTier;
use crate::codegen::GeneratedCode;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Instance-metadata key holding the generated code
pub const CODE_METADATA_KEY: &str = "generated-code";

/// Instance-metadata key holding the boot script
pub const STARTUP_SCRIPT_KEY: &str = "startup-script";

/// Default command run once the code is on disk
pub const DEFAULT_RUN_COMMAND: &str = "wolframscript -file script.wl";

/// Errors from instance creation
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Access token rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Provider refused the create request
    #[error("Create request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provisioner could not be built from configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Script and code handed to a new instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupPayload {
    script: String,
    code: GeneratedCode,
}

impl StartupPayload {
    /// Payload that fetches `code` from metadata and runs `run_command`
    pub fn new(code: GeneratedCode, run_command: &str) -> Self {
        let script = format!(
            "#!/bin/bash\n\
             # Run generated code delivered through instance metadata\n\
             curl -sf -H 'Metadata-Flavor: Google' \
             'http://metadata.google.internal/computeMetadata/v1/instance/attributes/{}' > script.wl\n\
             {}\n",
            CODE_METADATA_KEY, run_command
        );
        Self { script, code }
    }

    /// Boot script; identical for every payload with the same run command
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Generated code, verbatim
    pub fn code(&self) -> &GeneratedCode {
        &self.code
    }
}

/// One instance-creation call
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionRequest {
    pub instance_name: String,
    pub tier: ComputeTier,
    pub payload: StartupPayload,
}

impl ProvisionRequest {
    /// Request with a fresh `{prefix}-{8 hex}` instance name
    pub fn new(prefix: &str, tier: ComputeTier, payload: StartupPayload) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self {
            instance_name: format!("{}-{}", prefix.to_lowercase(), &suffix[..8]),
            tier,
            payload,
        }
    }
}

/// What the provider reported for a create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceHandle {
    pub name: String,
    pub zone: String,
    pub machine_type: String,
    /// Provider operation id, when returned
    pub operation: Option<String>,
    /// Provider operation status, when returned
    pub status: Option<String>,
}

/// Creates compute instances
#[async_trait]
pub trait ComputeProvisioner: Send + Sync {
    /// Create one instance. Not idempotent: every call is a new instance.
    async fn provision(&self, request: &ProvisionRequest) -> Result<InstanceHandle, ProvisionError>;
}
