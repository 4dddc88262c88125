//! Application configuration
//!
//! Loads `sciassist.toml` and overlays secrets and a few overrides from the
//! environment. Every section has defaults, so an empty file (or no file)
//! is a valid configuration; credentials must come from the environment.

use crate::lookup::wolfram;
use crate::prompt::PromptBuilder;
use crate::provision::GceSettings;
use crate::SciassistError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tooling::config::EnvSource;
use tracing::debug;

/// Prefix for non-secret overrides, e.g. `SCIASSIST_SERVER_PORT`
pub const ENV_PREFIX: &str = "SCIASSIST_";

/// Variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "SCIASSIST_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid environment override: {0}")]
    Env(#[from] tooling::ToolingError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for SciassistError {
    fn from(err: ConfigError) -> Self {
        SciassistError::Config(err.to_string())
    }
}

/// Language model section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
    /// From `GOOGLE_API_KEY`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-pro".to_string(),
            temperature: None,
            max_output_tokens: None,
            timeout_secs: None,
            api_key: None,
        }
    }
}

/// Computation/knowledge service section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputationSettings {
    pub base_url: String,
    pub timeout_secs: Option<u64>,
    /// From `WOLFRAM_ALPHA_APPID`
    #[serde(skip_serializing)]
    pub app_id: Option<String>,
}

impl Default for ComputationSettings {
    fn default() -> Self {
        Self {
            base_url: wolfram::DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            app_id: None,
        }
    }
}

/// Prompt construction section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    /// Target language named in prompts, e.g. "Wolfram Language"
    pub language: Option<String>,
    /// Default few-shot examples for `generate` and `deploy`
    pub examples: Vec<String>,
}

impl PromptSettings {
    /// Prompt builder naming the configured language
    pub fn prompt_builder(&self) -> PromptBuilder {
        match &self.language {
            Some(language) => PromptBuilder::new().with_language(language.clone()),
            None => PromptBuilder::new(),
        }
    }
}

/// Routing section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherSettings {
    /// Case-sensitive substring that marks a code request
    pub routing_keyword: String,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            routing_keyword: "Wolfram".to_string(),
        }
    }
}

/// HTTP form section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7860,
        }
    }
}

impl ServerSettings {
    /// `host:port` for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmSettings,
    pub computation: ComputationSettings,
    pub provisioner: GceSettings,
    pub prompt: PromptSettings,
    pub dispatcher: DispatcherSettings,
    pub server: ServerSettings,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Locate the config file, if any
    ///
    /// Searches:
    /// 1. `SCIASSIST_CONFIG`
    /// 2. `./config/sciassist.toml`
    /// 3. `./sciassist.toml`
    pub fn locate() -> Result<Option<PathBuf>, ConfigError> {
        if let Some(path) = EnvSource::bare().string(CONFIG_PATH_VAR)? {
            return Ok(Some(PathBuf::from(path)));
        }

        Ok([
            PathBuf::from("config/sciassist.toml"),
            PathBuf::from("./sciassist.toml"),
        ]
        .into_iter()
        .find(|p| p.exists()))
    }

    /// Load from the first file found (or defaults), apply the environment
    /// and validate
    pub fn load() -> Result<Self, ConfigError> {
        match Self::locate()? {
            Some(path) => Self::load_from(path),
            None => {
                debug!("No configuration file found, using defaults");
                Self::default().finish()
            }
        }
    }

    /// Like [`AppConfig::load`] but with an explicit file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        debug!("Loading configuration from {}", path.as_ref().display());
        Self::from_file(path)?.finish()
    }

    fn finish(mut self) -> Result<Self, ConfigError> {
        self.apply_env()?;
        self.validate()?;
        Ok(self)
    }

    /// Overlay secrets and `SCIASSIST_*` overrides
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        let secrets = EnvSource::bare();
        secrets.apply_optional("GOOGLE_API_KEY", &mut self.llm.api_key)?;
        secrets.apply_optional("WOLFRAM_ALPHA_APPID", &mut self.computation.app_id)?;
        secrets.apply_optional("GCE_ACCESS_TOKEN", &mut self.provisioner.access_token)?;
        secrets.apply_optional("GCE_PROJECT", &mut self.provisioner.project)?;

        let env = EnvSource::new(ENV_PREFIX);
        env.apply_string("llm_model", &mut self.llm.model)?;
        env.apply_string("routing_keyword", &mut self.dispatcher.routing_keyword)?;
        env.apply_string("server_host", &mut self.server.host)?;
        env.apply_string("gce_zone", &mut self.provisioner.zone)?;
        if let Some(port) = env.parse::<u16>("server_port")? {
            self.server.port = port;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatcher.routing_keyword.is_empty() {
            return Err(ConfigError::Invalid(
                "dispatcher.routing_keyword must not be empty".to_string(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".to_string()));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".to_string()));
        }
        Ok(())
    }

    /// One-line description for startup logs; secrets only as set/unset
    pub fn summary(&self) -> String {
        fn state(value: &Option<String>) -> &'static str {
            if value.is_some() {
                "set"
            } else {
                "unset"
            }
        }

        format!(
            "model={} keyword={:?} zone={} server={} google_api_key={} wolfram_appid={} gce_project={} gce_token={}",
            self.llm.model,
            self.dispatcher.routing_keyword,
            self.provisioner.zone,
            self.server.bind_address(),
            state(&self.llm.api_key),
            state(&self.computation.app_id),
            state(&self.provisioner.project),
            state(&self.provisioner.access_token),
        )
    }
}
