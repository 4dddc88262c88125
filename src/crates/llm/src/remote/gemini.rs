//! Google Gemini client implementation.
//!
//! Talks to the Gemini `generateContent` REST endpoint. The API key travels
//! as the `key` query parameter.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::remote::GeminiClient;
//! use llm::{RemoteLlmConfig, TextModel};
//!
//! let config = RemoteLlmConfig::from_env(
//!     "GOOGLE_API_KEY",
//!     "https://generativelanguage.googleapis.com/v1beta",
//!     "gemini-1.5-pro",
//! )?;
//! let client = GeminiClient::new(config)?;
//! let text = client.generate("Generate code for: analyze DNA sequence").await?;
//! ```

use crate::config::RemoteLlmConfig;
use crate::error::{LlmError, Result};
use crate::model::TextModel;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Google Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    config: RemoteLlmConfig,
    client: Client,
}

impl GeminiClient {
    /// Create a new Gemini client with the given configuration.
    pub fn new(config: RemoteLlmConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// Endpoint for the configured model.
    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the request body for a single-turn prompt.
    fn build_request(&self, prompt: &str) -> GeminiRequest {
        let generation_config = if self.config.temperature.is_some()
            || self.config.max_output_tokens.is_some()
        {
            Some(GeminiGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            })
        } else {
            None
        };

        GeminiRequest {
            contents: vec![GeminiMessage {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config,
        }
    }

    /// Pull the text of the first candidate out of a response.
    fn extract_text(response: GeminiResponse) -> Result<String> {
        let candidate = match response.candidates.into_iter().next() {
            Some(candidate) => candidate,
            None => {
                let reason = response
                    .prompt_feedback
                    .and_then(|f| f.block_reason)
                    .unwrap_or_else(|| "no candidates returned".to_string());
                return Err(LlmError::EmptyResponse(reason));
            }
        };

        let text = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<Vec<_>>().join(""))
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "candidate has no text".to_string());
            return Err(LlmError::EmptyResponse(reason));
        }

        Ok(text)
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint();
        debug!("POST {} ({} prompt chars)", url, prompt.chars().count());

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.config.api_key)])
            .json(&self.build_request(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status("Gemini", status, error_text));
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Self::extract_text(gemini_resp)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Gemini API types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiMessage {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GeminiClient {
        let config = RemoteLlmConfig::new(
            "test-key",
            "https://generativelanguage.googleapis.com/v1beta/",
            "gemini-1.5-pro",
        );
        GeminiClient::new(config).unwrap()
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            test_client().endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(test_client().build_request("Generate code for: x")).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Generate code for: x");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_generation_config_is_camel_case() {
        let config = RemoteLlmConfig::new("k", "https://example.test", "m")
            .with_temperature(0.5)
            .with_max_output_tokens(256);
        let client = GeminiClient::new(config).unwrap();
        let body = serde_json::to_value(client.build_request("p")).unwrap();
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Plot["},{"text":"Sin[x]]"}]},"finishReason":"STOP"}]}"#;
        let resp: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(GeminiClient::extract_text(resp).unwrap(), "Plot[Sin[x]]");
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let raw = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let resp: GeminiResponse = serde_json::from_str(raw).unwrap();
        match GeminiClient::extract_text(resp) {
            Err(LlmError::EmptyResponse(reason)) => assert_eq!(reason, "SAFETY"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_extract_text_candidate_without_content() {
        let raw = r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#;
        let resp: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            GeminiClient::extract_text(resp),
            Err(LlmError::EmptyResponse(_))
        ));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = RemoteLlmConfig::new("", "https://example.test", "m");
        assert!(GeminiClient::new(config).is_err());
    }
}
