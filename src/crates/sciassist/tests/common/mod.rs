//! Common test utilities: recording mocks for the three collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use llm::{LlmError, TextModel};
use sciassist::lookup::{ComputationClient, ComputationError};
use sciassist::provision::{ComputeProvisioner, InstanceHandle, ProvisionError, ProvisionRequest};
use sciassist::{CodeGenerator, Dispatcher, PromptBuilder};
use std::sync::{Arc, Mutex};

/// Language model that returns a fixed reply or a fixed failure
pub struct MockModel {
    pub prompts: Mutex<Vec<String>>,
    reply: std::result::Result<String, String>,
}

impl MockModel {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            reply: Ok(text.to_string()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            reply: Err(message.to_string()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextModel for MockModel {
    async fn generate(&self, prompt: &str) -> llm::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .map_err(LlmError::ProviderError)
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Computation service answering `"answer to {query}"` unless told to fail
pub struct MockLookup {
    pub queries: Mutex<Vec<String>>,
    fail_with: Option<String>,
}

impl MockLookup {
    pub fn answering() -> Arc<Self> {
        Arc::new(Self {
            queries: Mutex::new(Vec::new()),
            fail_with: None,
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            queries: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ComputationClient for MockLookup {
    async fn query(&self, query: &str) -> Result<String, ComputationError> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.fail_with {
            Some(message) => Err(ComputationError::Service {
                status: 503,
                message: message.clone(),
            }),
            None => Ok(format!("answer to {}", query)),
        }
    }

    fn name(&self) -> &str {
        "mock-lookup"
    }
}

/// Provisioner that records requests and reports the standard machine types
pub struct MockProvisioner {
    pub requests: Mutex<Vec<ProvisionRequest>>,
    reject: bool,
}

impl MockProvisioner {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            reject: false,
        })
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            reject: true,
        })
    }

    pub fn calls(&self) -> Vec<ProvisionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ComputeProvisioner for MockProvisioner {
    async fn provision(&self, request: &ProvisionRequest) -> Result<InstanceHandle, ProvisionError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.reject {
            return Err(ProvisionError::Rejected {
                status: 403,
                body: "quota exceeded".to_string(),
            });
        }
        Ok(InstanceHandle {
            name: request.instance_name.clone(),
            zone: "us-central1-a".to_string(),
            machine_type: sciassist::classifier::MachineTypes::default()
                .for_tier(request.tier)
                .to_string(),
            operation: Some("operation-1".to_string()),
            status: Some("PENDING".to_string()),
        })
    }
}

/// Dispatcher over the given mocks with a language-less prompt builder
pub fn dispatcher(model: Arc<MockModel>, lookup: Arc<MockLookup>) -> Dispatcher {
    Dispatcher::new(CodeGenerator::new(model, PromptBuilder::new()), lookup)
}
