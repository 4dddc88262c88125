//! Wolfram|Alpha Full Results API client
//!
//! Sends `GET {base}/v2/query?input=..&appid=..&output=json&format=plaintext`
//! and condenses the pods into two lines:
//!
//! ```text
//! Assumption: <input interpretation>
//! Answer: <primary result>
//! ```

use super::{ComputationClient, ComputationError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tooling::logging::sanitize_for_logging;
use tracing::debug;

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://api.wolframalpha.com";

/// Wolfram|Alpha client authenticated with an app id
#[derive(Clone)]
pub struct WolframAlphaClient {
    app_id: String,
    base_url: String,
    client: Client,
}

impl fmt::Debug for WolframAlphaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WolframAlphaClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl WolframAlphaClient {
    /// Create a client. `timeout` of `None` waits indefinitely.
    pub fn new(
        app_id: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ComputationError> {
        let app_id = app_id.into();
        if app_id.trim().is_empty() {
            return Err(ComputationError::Config("Wolfram|Alpha app id is empty".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            app_id,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v2/query", self.base_url)
    }
}

#[async_trait]
impl ComputationClient for WolframAlphaClient {
    async fn query(&self, query: &str) -> Result<String, ComputationError> {
        let request = self
            .client
            .get(self.endpoint())
            .query(&[
                ("input", query),
                ("appid", self.app_id.as_str()),
                ("output", "json"),
                ("format", "plaintext"),
            ])
            .build()?;
        debug!("GET {}", sanitize_for_logging(request.url().as_str()));

        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => ComputationError::Authentication(message),
                code => ComputationError::Service {
                    status: code,
                    message,
                },
            });
        }

        let envelope: QueryEnvelope = response
            .json()
            .await
            .map_err(|e| ComputationError::InvalidResponse(e.to_string()))?;

        summarize(query, envelope.queryresult)
    }

    fn name(&self) -> &str {
        "wolfram_alpha"
    }
}

#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    queryresult: QueryResult,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    success: bool,
    /// `false`, or an object with `code` and `msg`
    #[serde(default)]
    error: Value,
    #[serde(default)]
    pods: Vec<Pod>,
}

#[derive(Debug, Deserialize)]
struct Pod {
    #[serde(default)]
    title: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    primary: bool,
    #[serde(default)]
    subpods: Vec<SubPod>,
}

#[derive(Debug, Deserialize)]
struct SubPod {
    #[serde(default)]
    plaintext: String,
}

impl Pod {
    fn text(&self) -> Option<String> {
        let lines: Vec<&str> = self
            .subpods
            .iter()
            .map(|s| s.plaintext.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    fn is_input(&self) -> bool {
        self.id == "Input" || self.title.starts_with("Input")
    }
}

fn summarize(query: &str, result: QueryResult) -> Result<String, ComputationError> {
    if let Some(message) = result.error.get("msg").and_then(Value::as_str) {
        return Err(if message.to_lowercase().contains("appid") {
            ComputationError::Authentication(message.to_string())
        } else {
            ComputationError::Service {
                status: 200,
                message: message.to_string(),
            }
        });
    }

    if !result.success || result.pods.is_empty() {
        return Err(ComputationError::NoAnswer(query.to_string()));
    }

    let assumption_idx = result.pods.iter().position(Pod::is_input).unwrap_or(0);
    let assumption = result.pods[assumption_idx]
        .text()
        .unwrap_or_else(|| query.to_string());

    let answer = result
        .pods
        .iter()
        .find(|p| p.primary)
        .or_else(|| result.pods.iter().find(|p| p.title == "Result"))
        .and_then(Pod::text)
        .or_else(|| {
            result
                .pods
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != assumption_idx)
                .find_map(|(_, p)| p.text())
        })
        .ok_or_else(|| ComputationError::NoAnswer(query.to_string()))?;

    Ok(format!("Assumption: {}\nAnswer: {}", assumption, answer))
}
