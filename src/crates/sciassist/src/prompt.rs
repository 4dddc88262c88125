//! Prompt construction for code generation and debugging
//!
//! Few-shot examples are listed under an `Examples:` header, one per line and
//! in the order supplied, ahead of the generation instruction. Nothing is
//! validated or escaped.

/// Formats intents and code into model prompts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptBuilder {
    /// Target language named in the instruction, e.g. "Wolfram Language"
    language: Option<String>,
}

impl PromptBuilder {
    /// Builder whose instructions do not name a language
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the target language in every instruction
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        self.language = if language.trim().is_empty() {
            None
        } else {
            Some(language)
        };
        self
    }

    /// Target language, if any
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Code-generation prompt for `intent` with optional few-shot examples
    pub fn build<S: AsRef<str>>(&self, intent: &str, examples: &[S]) -> String {
        let instruction = match &self.language {
            Some(language) => format!("Generate {} code for: {}", language, intent),
            None => format!("Generate code for: {}", intent),
        };

        if examples.is_empty() {
            return instruction;
        }

        let mut prompt = String::from("Examples:\n");
        for example in examples {
            prompt.push_str(example.as_ref());
            prompt.push('\n');
        }
        prompt.push_str(&instruction);
        prompt
    }

    /// Debugging prompt for previously generated `code`
    pub fn build_debug(&self, code: &str) -> String {
        match &self.language {
            Some(language) => format!("Debug the following {} code: {}", language, code),
            None => format!("Debug the following code: {}", code),
        }
    }
}
