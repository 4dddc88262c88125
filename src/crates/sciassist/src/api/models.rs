//! Request and response bodies for the form API

use serde::{Deserialize, Serialize};

use crate::dispatcher::Route;

/// POST /api/v1/query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Backend that answered
    pub route: Route,
    /// Generated code or lookup answer
    pub text: String,
}

/// POST /api/v1/debug
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugRequest {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugResponse {
    /// Model's debugged code or commentary
    pub code: String,
}

/// POST /api/v1/visualize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizeRequest {
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizeResponse {
    pub text: String,
}

/// GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,
    /// Whether a compute provisioner is configured
    pub deploy_enabled: bool,
    /// API version
    pub version: String,
    /// Current timestamp
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(status: impl Into<String>, deploy_enabled: bool) -> Self {
        Self {
            status: status.into(),
            deploy_enabled,
            version: crate::version::VERSION.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
