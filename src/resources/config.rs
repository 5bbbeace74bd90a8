//! `edgedelta_config`: pipeline configurations.
//!
//! Creating a config posts it (or adopts an existing one when `conf_id` is
//! set). Changing its content afterwards goes through the pipeline flow:
//! save the new content as a draft, then, unless `deploy` is false, deploy
//! the newest saved version. A failed deploy leaves the draft in place and is
//! reported as [`ProviderError::NotDeployed`].

use serde_json::Value;
use tracing::{info, warn};

use super::{resource_id, Resource, StateBuilder, StateReader};
use crate::client::ApiClient;
use crate::error::{ApiError, ProviderError};
use crate::models::{
    Config, SaveConfigRequest, ENVIRONMENTS, FLEET_SUBTYPES, FLEET_TYPES, KUBERNETES_ENVIRONMENT,
};
use crate::schema::{Attribute, Diagnostic, Schema, ValueValidator};
use crate::types::ResourceState;
use crate::validation;

pub const TYPE_NAME: &str = "edgedelta_config";

/// Keys that version 0 state carried on the resource and that now belong to the provider block.
const LEGACY_PROVIDER_KEYS: &[&str] = &["org_id", "api_key_envvar", "api_endpoint", "debug"];

/// Attributes sent with `PUT confs/{id}` rather than through a pipeline save.
const METADATA_ATTRIBUTES: &[&str] = &[
    "tag",
    "environment",
    "fleet_type",
    "fleet_subtype",
    "cluster_name",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigResource;

impl ConfigResource {
    fn config_from_state(state: &Value) -> Config {
        let reader = StateReader::new(state);
        Config {
            content: reader.string("config_content"),
            description: reader.string("description"),
            tag: reader.string("tag"),
            environment: reader.string("environment"),
            fleet_type: reader.string("fleet_type"),
            fleet_subtype: reader.string("fleet_subtype"),
            cluster_name: reader.string("cluster_name"),
            ..Default::default()
        }
    }

    fn write_state(builder: StateBuilder, config: &Config) -> ResourceState {
        builder
            .set("id", config.id.as_str())
            .set("conf_id", config.id.as_str())
            .set("org_id", config.org_id.as_str())
            .set_or_null("config_content", &config.content)
            .set_or_null("description", &config.description)
            .set_or_null("tag", &config.tag)
            .set_or_null("environment", &config.environment)
            .set_or_null("fleet_type", &config.fleet_type)
            .set_or_null("fleet_subtype", &config.fleet_subtype)
            .set_or_null("cluster_name", &config.cluster_name)
            .build()
    }

    fn metadata_changed(prior: &Value, planned: &Value) -> bool {
        let prior = StateReader::new(prior);
        let planned = StateReader::new(planned);
        METADATA_ATTRIBUTES
            .iter()
            .any(|name| prior.string(name) != planned.string(name))
    }

    /// Deploy the newest saved version of a pipeline.
    async fn deploy_latest(client: &ApiClient, config_id: &str) -> Result<i64, ProviderError> {
        let not_deployed = |reason: String| ProviderError::NotDeployed {
            config_id: config_id.to_string(),
            reason,
        };

        let history = client
            .get_config_history(config_id)
            .await
            .map_err(|err| not_deployed(format!("could not read the config history: {}", err)))?;
        let latest = history
            .first()
            .ok_or_else(|| not_deployed("the config history is empty".to_string()))?;

        client
            .deploy_config(config_id, latest.timestamp)
            .await
            .map_err(|err| not_deployed(err.to_string()))?;
        Ok(latest.timestamp)
    }
}

#[async_trait::async_trait]
impl Resource for ConfigResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn kind(&self) -> &'static str {
        "config"
    }

    fn id_attribute(&self) -> &'static str {
        "conf_id"
    }

    fn schema(&self) -> Schema {
        Schema::new(1)
            .with_description("Manages an Edge Delta pipeline configuration.")
            .with_attribute(
                "config_content",
                Attribute::required_string().with_description("Configuration file data"),
            )
            .with_attribute(
                "conf_id",
                Attribute::optional_computed_string()
                    .with_description("Unique configuration ID. Set it to adopt an existing config.")
                    .with_validator(ValueValidator::Uuid),
            )
            .with_attribute(
                "description",
                Attribute::optional_string().with_description("Configuration description"),
            )
            .with_attribute(
                "tag",
                Attribute::optional_computed_string().with_description("Configuration version tag"),
            )
            .with_attribute(
                "environment",
                Attribute::optional_string()
                    .with_description("Environment the configuration targets")
                    .with_validator(ValueValidator::one_of(ENVIRONMENTS)),
            )
            .with_attribute(
                "fleet_type",
                Attribute::optional_string()
                    .with_description("Fleet type")
                    .with_validator(ValueValidator::one_of(FLEET_TYPES)),
            )
            .with_attribute(
                "fleet_subtype",
                Attribute::optional_string()
                    .with_description("Fleet subtype, required for Kubernetes")
                    .with_validator(ValueValidator::one_of(FLEET_SUBTYPES)),
            )
            .with_attribute(
                "cluster_name",
                Attribute::optional_string().with_description("Cluster name"),
            )
            .with_attribute(
                "deploy",
                Attribute::optional_bool()
                    .with_description("Deploy the saved configuration after each update")
                    .with_default(Value::Bool(true)),
            )
            .with_attribute(
                "org_id",
                Attribute::computed_string().with_description("Unique organization ID"),
            )
            .with_attribute("id", Attribute::computed_string())
    }

    fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        let mut diagnostics = validation::validate(&self.schema(), config);
        let reader = StateReader::new(config);
        if reader.non_empty("environment") == Some(KUBERNETES_ENVIRONMENT)
            && reader.non_empty("fleet_subtype").is_none()
        {
            diagnostics.push(
                Diagnostic::error("Missing required attribute 'fleet_subtype'")
                    .with_detail(format!(
                        "fleet_subtype must be set when environment is {}",
                        KUBERNETES_ENVIRONMENT
                    ))
                    .with_attribute("fleet_subtype"),
            );
        }
        diagnostics
    }

    fn upgrade_state(&self, version: i64, mut state: Value) -> Result<Value, ProviderError> {
        if version == 0 {
            if let Value::Object(map) = &mut state {
                for key in LEGACY_PROVIDER_KEYS {
                    map.remove(*key);
                }
            }
        }
        Ok(state)
    }

    async fn create(
        &self,
        client: &ApiClient,
        planned: &Value,
    ) -> Result<ResourceState, ProviderError> {
        let config = Self::config_from_state(planned);
        let created = match StateReader::new(planned).non_empty("conf_id") {
            None => client
                .create_config(&config)
                .await
                .map_err(|err| ProviderError::api("Could not create the config resource", err))?,
            Some(conf_id) => client
                .update_config(conf_id, &config)
                .await
                .map_err(|err| ProviderError::api("Could not update the config resource", err))?,
        };
        info!(config_id = %created.id, "Config created");
        Ok(Self::write_state(StateBuilder::from_state(planned), &created))
    }

    async fn update(
        &self,
        client: &ApiClient,
        prior: &Value,
        planned: &Value,
    ) -> Result<ResourceState, ProviderError> {
        let config_id = resource_id(prior, self.id_attribute(), self.kind())?;
        let config = Self::config_from_state(planned);

        if Self::metadata_changed(prior, planned) {
            client
                .update_config(&config_id, &config)
                .await
                .map_err(|err| ProviderError::api("Could not update the config resource", err))?;
        }

        let receipt = client
            .save_config(
                &config_id,
                &SaveConfigRequest {
                    content: config.content.clone(),
                    description: config.description.clone(),
                },
            )
            .await
            .map_err(|err| ProviderError::api("Could not save the config resource", err))?;
        info!(config_id = %config_id, tag = %receipt.tag, "Config saved");

        if StateReader::new(planned).bool_or("deploy", true) {
            let version = Self::deploy_latest(client, &config_id).await?;
            info!(config_id = %config_id, version = version, "Config deployed");
        } else {
            warn!(config_id = %config_id, "Config saved as draft, deploy disabled");
        }

        let refreshed = client.get_config(&config_id).await.map_err(|err| {
            ProviderError::api("Could not read the config resource after update", err)
        })?;
        Ok(Self::write_state(StateBuilder::from_state(planned), &refreshed))
    }

    async fn fetch(&self, client: &ApiClient, id: &str) -> Result<ResourceState, ApiError> {
        let config = client.get_config(id).await?;
        Ok(Self::write_state(StateBuilder::new(), &config))
    }

    async fn fetch_all(&self, client: &ApiClient) -> Result<Vec<ResourceState>, ApiError> {
        let configs = client.get_all_configs().await?;
        Ok(configs
            .iter()
            .map(|config| Self::write_state(StateBuilder::new(), config))
            .collect())
    }

    async fn remove(&self, client: &ApiClient, id: &str) -> Result<(), ApiError> {
        client.delete_config(id).await
    }
}
