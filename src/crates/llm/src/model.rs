//! The text-generation capability the orchestrator depends on.

use crate::error::Result;
use async_trait::async_trait;

/// A hosted model that turns a prompt into text.
///
/// One call is one attempt: implementations do not retry.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Identifier of the model answering requests.
    fn model_name(&self) -> &str;
}
