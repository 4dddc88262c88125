//! Configuration for remote language-model providers.

use crate::error::{LlmError, Result};
use std::fmt;
use std::time::Duration;

/// Configuration for a hosted model API.
#[derive(Clone)]
pub struct RemoteLlmConfig {
    /// API key for authentication.
    pub api_key: String,

    /// Base URL for the API, e.g. "https://generativelanguage.googleapis.com/v1beta".
    pub base_url: String,

    /// Model name/identifier.
    pub model: String,

    /// Request timeout. `None` waits for the provider indefinitely.
    pub timeout: Option<Duration>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens.
    pub max_output_tokens: Option<u32>,
}

impl RemoteLlmConfig {
    /// Create a new remote LLM configuration.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            timeout: None,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Create configuration with the API key taken from an environment variable.
    pub fn from_env(
        env_var: &str,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let api_key = tooling::config::get_env(env_var)
            .map_err(|e| LlmError::ConfigError(e.to_string()))?
            .ok_or_else(|| LlmError::ApiKeyNotFound(format!("Environment variable: {}", env_var)))?;

        Ok(Self::new(api_key, base_url, model))
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output token limit.
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }

    /// Check that the configuration can be used to build a client.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::ApiKeyNotFound("API key is empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::ConfigError("model name is empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(LlmError::ConfigError(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for RemoteLlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteLlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}
