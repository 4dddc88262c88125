//! API error types and HTTP response conversion
//!
//! Dispatcher failures map to 502 when an upstream service failed, 400 when
//! the caller sent unusable input and 500 for local configuration problems.
//! Unreadable request bodies are reported as 400 with the same JSON shape.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{FailureKind, SciassistError};

/// API error response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always false
    pub success: bool,
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for programmatic handling
    pub code: String,
}

impl ApiErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request data
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Failure reported by the dispatcher
    #[error(transparent)]
    Dispatch(#[from] SciassistError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Dispatch(e) => match e.kind() {
                FailureKind::NetworkOrAuth | FailureKind::Provisioning => StatusCode::BAD_GATEWAY,
                FailureKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
                FailureKind::InvalidInput => StatusCode::BAD_REQUEST,
            },
        }
    }

    /// Get the error code identifier
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Dispatch(e) => match e.kind() {
                FailureKind::NetworkOrAuth => "UPSTREAM_ERROR",
                FailureKind::Provisioning => "PROVISIONING_ERROR",
                FailureKind::Configuration => "CONFIG_ERROR",
                FailureKind::InvalidInput => "BAD_REQUEST",
            },
        }
    }

    /// Get the error type name
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::Dispatch(SciassistError::LanguageModel(_)) => "LanguageModelError",
            ApiError::Dispatch(SciassistError::Computation(_)) => "ComputationError",
            ApiError::Dispatch(SciassistError::Provisioning(_)) => "ProvisioningError",
            ApiError::Dispatch(SciassistError::Config(_)) => "ConfigError",
            ApiError::Dispatch(SciassistError::InvalidInput(_)) => "BadRequest",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiErrorResponse::new(self.error_type(), self.to_string(), self.code());

        if status.is_server_error() {
            tracing::error!("API Error: {:?}", body);
        } else {
            tracing::warn!("API Error: {:?}", body);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::ComputationError;
    use crate::provision::ProvisionError;

    #[test]
    fn test_upstream_failure_is_bad_gateway() {
        let err = ApiError::from(SciassistError::from(llm::LlmError::AuthenticationError(
            "bad key".into(),
        )));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), "UPSTREAM_ERROR");
        assert_eq!(err.error_type(), "LanguageModelError");

        let err = ApiError::from(SciassistError::from(ComputationError::NoAnswer("x".into())));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_type(), "ComputationError");
    }

    #[test]
    fn test_provisioning_failure() {
        let err = ApiError::from(SciassistError::from(ProvisionError::Authentication(
            "expired".into(),
        )));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), "PROVISIONING_ERROR");
    }

    #[test]
    fn test_config_and_input_errors() {
        let err = ApiError::from(SciassistError::Config("missing".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "CONFIG_ERROR");

        let err = ApiError::from(SciassistError::InvalidInput("empty".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = ApiError::BadRequest("malformed".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Bad request: malformed");
    }

    #[test]
    fn test_message_is_cause_description() {
        let err = ApiError::from(SciassistError::from(llm::LlmError::ProviderError(
            "model overloaded".into(),
        )));
        assert_eq!(
            err.to_string(),
            "Language model call failed: Provider error: model overloaded"
        );
    }
}
