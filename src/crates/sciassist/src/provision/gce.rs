//! Google Compute Engine provisioner
//!
//! Issues `POST {base}/projects/{project}/zones/{zone}/instances` with a
//! bearer access token. Boot image and network are fixed by configuration;
//! only the machine type follows the tier.

use super::{
    ComputeProvisioner, InstanceHandle, ProvisionError, ProvisionRequest, CODE_METADATA_KEY,
    DEFAULT_RUN_COMMAND, STARTUP_SCRIPT_KEY,
};
use crate::classifier::MachineTypes;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Settings for the `[provisioner]` config section
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GceSettings {
    /// Compute API root
    pub base_url: String,
    /// GCP project id; provisioning is disabled while unset
    pub project: Option<String>,
    pub zone: String,
    /// Instance names are `{instance_prefix}-{8 hex}`
    pub instance_prefix: String,
    pub source_image: String,
    pub network: String,
    /// Command the startup script runs after fetching the code
    pub run_command: String,
    pub machine_types: MachineTypes,
    pub timeout_secs: Option<u64>,
    /// OAuth access token, from `GCE_ACCESS_TOKEN`
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
}

impl Default for GceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://compute.googleapis.com/compute/v1".to_string(),
            project: None,
            zone: "us-central1-a".to_string(),
            instance_prefix: "wolfram-instance".to_string(),
            source_image: "projects/debian-cloud/global/images/family/debian-10".to_string(),
            network: "global/networks/default".to_string(),
            run_command: DEFAULT_RUN_COMMAND.to_string(),
            machine_types: MachineTypes::default(),
            timeout_secs: None,
            access_token: None,
        }
    }
}

impl fmt::Debug for GceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GceSettings")
            .field("base_url", &self.base_url)
            .field("project", &self.project)
            .field("zone", &self.zone)
            .field("instance_prefix", &self.instance_prefix)
            .field("source_image", &self.source_image)
            .field("network", &self.network)
            .field("run_command", &self.run_command)
            .field("machine_types", &self.machine_types)
            .field("timeout_secs", &self.timeout_secs)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl GceSettings {
    /// True when both project and token are present
    pub fn is_configured(&self) -> bool {
        self.project.is_some() && self.access_token.is_some()
    }
}

/// Provisioner backed by the Compute Engine REST API
#[derive(Clone)]
pub struct GceProvisioner {
    settings: GceSettings,
    project: String,
    access_token: String,
    client: Client,
}

impl GceProvisioner {
    /// Build from settings; fails if project or token is missing
    pub fn new(settings: GceSettings) -> Result<Self, ProvisionError> {
        let project = settings
            .project
            .clone()
            .ok_or_else(|| ProvisionError::Config("provisioner.project is not set".to_string()))?;
        let access_token = settings
            .access_token
            .clone()
            .ok_or_else(|| ProvisionError::Config("GCE_ACCESS_TOKEN is not set".to_string()))?;

        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            settings,
            project,
            access_token,
            client: builder.build()?,
        })
    }

    /// Settings in use
    pub fn settings(&self) -> &GceSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/projects/{}/zones/{}/instances",
            self.settings.base_url.trim_end_matches('/'),
            self.project,
            self.settings.zone
        )
    }

    /// `instances.insert` body for `request`
    pub fn instance_body(&self, request: &ProvisionRequest) -> Value {
        let zone = &self.settings.zone;
        let machine_type = self.settings.machine_types.for_tier(request.tier);

        json!({
            "name": request.instance_name,
            "machineType": format!("zones/{}/machineTypes/{}", zone, machine_type),
            "disks": [{
                "boot": true,
                "autoDelete": true,
                "initializeParams": {"sourceImage": self.settings.source_image}
            }],
            "networkInterfaces": [{
                "network": self.settings.network,
                "accessConfigs": [{"type": "ONE_TO_ONE_NAT", "name": "External NAT"}]
            }],
            "metadata": {
                "items": [
                    {"key": STARTUP_SCRIPT_KEY, "value": request.payload.script()},
                    {"key": CODE_METADATA_KEY, "value": request.payload.code().as_str()}
                ]
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct Operation {
    name: Option<String>,
    status: Option<String>,
}

#[async_trait]
impl ComputeProvisioner for GceProvisioner {
    async fn provision(&self, request: &ProvisionRequest) -> Result<InstanceHandle, ProvisionError> {
        let machine_type = self.settings.machine_types.for_tier(request.tier).to_string();
        debug!(
            "Creating instance {} ({}) in {}",
            request.instance_name, machine_type, self.settings.zone
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.access_token)
            .json(&self.instance_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => ProvisionError::Authentication(body),
                code => ProvisionError::Rejected { status: code, body },
            });
        }

        let operation: Operation = response
            .json()
            .await
            .map_err(|e| ProvisionError::InvalidResponse(e.to_string()))?;

        info!(
            "Instance {} requested (operation {:?}, status {:?})",
            request.instance_name, operation.name, operation.status
        );

        Ok(InstanceHandle {
            name: request.instance_name.clone(),
            zone: self.settings.zone.clone(),
            machine_type,
            operation: operation.name,
            status: operation.status,
        })
    }
}
