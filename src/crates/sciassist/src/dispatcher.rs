//! Query routing and the generate → classify → provision pipeline

use crate::classifier::{classify, ComputeTier};
use crate::codegen::{CodeGenerator, GeneratedCode};
use crate::config::AppConfig;
use crate::lookup::{ComputationClient, ComputationError, WolframAlphaClient};
use crate::provision::{
    ComputeProvisioner, GceProvisioner, InstanceHandle, ProvisionRequest, StartupPayload,
    DEFAULT_RUN_COMMAND,
};
use crate::{Result, SciassistError};
use async_trait::async_trait;
use futures::future::join_all;
use llm::remote::GeminiClient;
use llm::{LlmError, RemoteLlmConfig, TextModel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tooling::logging::{preview, timed};
use tracing::{debug, error, info};

/// Default routing keyword
pub const DEFAULT_ROUTING_KEYWORD: &str = "Wolfram";

const MODEL_KEY_VAR: &str = "GOOGLE_API_KEY";
const LOOKUP_KEY_VAR: &str = "WOLFRAM_ALPHA_APPID";
const NO_EXAMPLES: &[&str] = &[];

/// Backend chosen for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Few-shot code generation through the language model
    CodeGen,
    /// Computation/knowledge lookup
    Lookup,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::CodeGen => write!(f, "code_gen"),
            Route::Lookup => write!(f, "lookup"),
        }
    }
}

/// Result of [`Dispatcher::dispatch`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub route: Route,
    pub text: String,
}

/// Result of [`Dispatcher::generate_and_deploy`]
#[derive(Debug, Clone, Serialize)]
pub struct Deployment {
    pub code: GeneratedCode,
    pub tier: ComputeTier,
    pub instance: InstanceHandle,
}

/// Routes queries and drives deployments
///
/// Holds no per-query state; one instance can serve concurrent requests.
#[derive(Clone)]
pub struct Dispatcher {
    generator: CodeGenerator,
    lookup: Arc<dyn ComputationClient>,
    provisioner: Option<Arc<dyn ComputeProvisioner>>,
    routing_keyword: String,
    examples: Vec<String>,
    instance_prefix: String,
    run_command: String,
}

impl Dispatcher {
    pub fn new(generator: CodeGenerator, lookup: Arc<dyn ComputationClient>) -> Self {
        Self {
            generator,
            lookup,
            provisioner: None,
            routing_keyword: DEFAULT_ROUTING_KEYWORD.to_string(),
            examples: Vec::new(),
            instance_prefix: "wolfram-instance".to_string(),
            run_command: DEFAULT_RUN_COMMAND.to_string(),
        }
    }

    pub fn with_provisioner(mut self, provisioner: Arc<dyn ComputeProvisioner>) -> Self {
        self.provisioner = Some(provisioner);
        self
    }

    pub fn with_routing_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.routing_keyword = keyword.into();
        self
    }

    /// Default few-shot examples for direct generation. Routed queries
    /// never use them.
    pub fn with_examples(mut self, examples: Vec<String>) -> Self {
        self.examples = examples;
        self
    }

    pub fn with_instance_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.instance_prefix = prefix.into();
        self
    }

    pub fn with_run_command(mut self, command: impl Into<String>) -> Self {
        self.run_command = command.into();
        self
    }

    /// Build every collaborator from configuration
    ///
    /// The provisioner is optional: without a GCE project and access token
    /// the dispatcher still answers queries, and deploys fail with a
    /// configuration error.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::from_config_requiring(config, Credentials::ALL)
    }

    /// Like [`Dispatcher::from_config`], but only the backends in `required`
    /// must have credentials. A backend without them is replaced by one that
    /// fails every call with a configuration error.
    pub fn from_config_requiring(config: &AppConfig, required: Credentials) -> Result<Self> {
        let model: Arc<dyn TextModel> = match config.llm.api_key.clone() {
            Some(api_key) => {
                let mut llm_config =
                    RemoteLlmConfig::new(api_key, config.llm.base_url.clone(), config.llm.model.clone());
                if let Some(secs) = config.llm.timeout_secs {
                    llm_config = llm_config.with_timeout(Duration::from_secs(secs));
                }
                if let Some(temperature) = config.llm.temperature {
                    llm_config = llm_config.with_temperature(temperature);
                }
                if let Some(max) = config.llm.max_output_tokens {
                    llm_config = llm_config.with_max_output_tokens(max);
                }
                Arc::new(GeminiClient::new(llm_config)?)
            }
            None if required.model => {
                return Err(LlmError::ApiKeyNotFound(format!("{} is not set", MODEL_KEY_VAR)).into())
            }
            None => Arc::new(Unconfigured),
        };

        let lookup: Arc<dyn ComputationClient> = match config.computation.app_id.clone() {
            Some(app_id) => Arc::new(WolframAlphaClient::new(
                app_id,
                config.computation.base_url.clone(),
                config.computation.timeout_secs.map(Duration::from_secs),
            )?),
            None if required.lookup => {
                return Err(ComputationError::Config(format!("{} is not set", LOOKUP_KEY_VAR)).into())
            }
            None => Arc::new(Unconfigured),
        };

        let prompts = config.prompt.prompt_builder();
        let mut dispatcher = Self::new(CodeGenerator::new(model, prompts), lookup)
            .with_routing_keyword(config.dispatcher.routing_keyword.clone())
            .with_examples(config.prompt.examples.clone())
            .with_instance_prefix(config.provisioner.instance_prefix.clone())
            .with_run_command(config.provisioner.run_command.clone());

        if config.provisioner.is_configured() {
            let provisioner = GceProvisioner::new(config.provisioner.clone())?;
            dispatcher = dispatcher.with_provisioner(Arc::new(provisioner));
        } else {
            info!("GCE project or access token not set; deployment disabled");
        }

        Ok(dispatcher)
    }

    pub fn routing_keyword(&self) -> &str {
        &self.routing_keyword
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Whether [`Dispatcher::deploy`] can reach a provider
    pub fn can_deploy(&self) -> bool {
        self.provisioner.is_some()
    }

    /// Case-sensitive substring test against the routing keyword
    pub fn route(&self, query: &str) -> Route {
        if query.contains(&self.routing_keyword) {
            Route::CodeGen
        } else {
            Route::Lookup
        }
    }

    /// Answer `query` on the route it selects. No fallback between routes.
    pub async fn dispatch(&self, query: &str) -> Result<DispatchOutcome> {
        let route = self.route(query);
        debug!("Routing {:?} to {}", preview(query, 80), route);

        let text = match route {
            Route::CodeGen => self.generator.generate(query, NO_EXAMPLES).await?.into_string(),
            Route::Lookup => self.lookup(query).await?,
        };

        Ok(DispatchOutcome { route, text })
    }

    /// Query the computation service directly
    pub async fn lookup(&self, query: &str) -> Result<String> {
        let answer = timed(
            &format!("{}.query", self.lookup.name()),
            self.lookup.query(query),
        )
        .await?;
        Ok(answer)
    }

    /// Run independent lookups concurrently; results keep input order
    pub async fn lookup_many<S: AsRef<str>>(&self, queries: &[S]) -> Vec<Result<String>> {
        join_all(queries.iter().map(|q| self.lookup(q.as_ref()))).await
    }

    /// Generate code with caller-supplied examples
    pub async fn generate<S: AsRef<str>>(&self, intent: &str, examples: &[S]) -> Result<GeneratedCode> {
        self.generator.generate(intent, examples).await
    }

    /// Ask the model to debug `code`
    pub async fn debug(&self, code: &str) -> Result<GeneratedCode> {
        if code.trim().is_empty() {
            return Err(SciassistError::InvalidInput("no code to debug".to_string()));
        }
        self.generator.debug(code).await
    }

    /// Placeholder rendering of `data`
    pub fn visualize(&self, data: &str) -> String {
        format!("Visualizing: {}", data)
    }

    /// Provision one instance, sized by `task_type`, that runs `code`
    pub async fn deploy(&self, task_type: &str, code: GeneratedCode) -> Result<InstanceHandle> {
        let provisioner = self.provisioner()?;
        self.provision(provisioner, task_type, classify(task_type), code).await
    }

    /// Generate, classify and provision, in that order, without validation
    /// of the generated code
    ///
    /// Fails before calling the model when no provisioner is configured.
    pub async fn generate_and_deploy<S: AsRef<str>>(
        &self,
        intent: &str,
        examples: &[S],
        task_type: &str,
    ) -> Result<Deployment> {
        let provisioner = self.provisioner()?;
        let code = self.generator.generate(intent, examples).await?;
        let tier = classify(task_type);
        let instance = self.provision(provisioner, task_type, tier, code.clone()).await?;
        Ok(Deployment { code, tier, instance })
    }

    fn provisioner(&self) -> Result<&Arc<dyn ComputeProvisioner>> {
        self.provisioner
            .as_ref()
            .ok_or_else(|| SciassistError::Config("no compute provisioner configured".to_string()))
    }

    async fn provision(
        &self,
        provisioner: &Arc<dyn ComputeProvisioner>,
        task_type: &str,
        tier: ComputeTier,
        code: GeneratedCode,
    ) -> Result<InstanceHandle> {
        let request = ProvisionRequest::new(
            &self.instance_prefix,
            tier,
            StartupPayload::new(code, &self.run_command),
        );
        info!("Provisioning {} for task type {:?} ({})", request.instance_name, task_type, tier);

        match timed("provision", provisioner.provision(&request)).await {
            Ok(handle) => Ok(handle),
            Err(e) => {
                error!("Provisioning {} failed: {}", request.instance_name, e);
                Err(e.into())
            }
        }
    }
}

/// Which backends must have credentials when building from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials {
    pub model: bool,
    pub lookup: bool,
}

impl Credentials {
    pub const ALL: Self = Self { model: true, lookup: true };
    pub const MODEL: Self = Self { model: true, lookup: false };
    pub const LOOKUP: Self = Self { model: false, lookup: true };
    pub const NONE: Self = Self { model: false, lookup: false };
}

/// Stand-in for a backend whose credentials are missing
struct Unconfigured;

#[async_trait]
impl TextModel for Unconfigured {
    async fn generate(&self, _prompt: &str) -> llm::Result<String> {
        Err(LlmError::ApiKeyNotFound(format!("{} is not set", MODEL_KEY_VAR)))
    }

    fn model_name(&self) -> &str {
        "unconfigured"
    }
}

#[async_trait]
impl ComputationClient for Unconfigured {
    async fn query(&self, _query: &str) -> std::result::Result<String, ComputationError> {
        Err(ComputationError::Config(format!("{} is not set", LOOKUP_KEY_VAR)))
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}
