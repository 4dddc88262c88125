//! Code generation and debugging through a language model

use crate::prompt::PromptBuilder;
use crate::Result;
use llm::TextModel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tooling::logging::{preview, timed};
use tracing::debug;

/// Text produced by the model. Opaque: never parsed or validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedCode(String);

impl GeneratedCode {
    /// Wrap model output
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Borrow the code text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the code text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for GeneratedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for GeneratedCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// Couples prompt construction with a text model
#[derive(Clone)]
pub struct CodeGenerator {
    model: Arc<dyn TextModel>,
    prompts: PromptBuilder,
}

impl CodeGenerator {
    /// Create a generator over `model`
    pub fn new(model: Arc<dyn TextModel>, prompts: PromptBuilder) -> Self {
        Self { model, prompts }
    }

    /// Prompt builder in use
    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Generate code for `intent`, steered by few-shot `examples`
    pub async fn generate<S: AsRef<str>>(&self, intent: &str, examples: &[S]) -> Result<GeneratedCode> {
        let prompt = self.prompts.build(intent, examples);
        debug!("Generation prompt: {}", preview(&prompt, 200));

        let text = timed(
            &format!("{}.generate", self.model.model_name()),
            self.model.generate(&prompt),
        )
        .await?;
        Ok(GeneratedCode::new(text))
    }

    /// Ask the model to debug `code`
    pub async fn debug(&self, code: &str) -> Result<GeneratedCode> {
        let prompt = self.prompts.build_debug(code);
        debug!("Debug prompt: {}", preview(&prompt, 200));

        let text = timed(
            &format!("{}.debug", self.model.model_name()),
            self.model.generate(&prompt),
        )
        .await?;
        Ok(GeneratedCode::new(text))
    }
}
