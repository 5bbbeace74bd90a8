//! Pipeline config endpoints: `confs` CRUD plus the `pipelines` save/deploy flow.

use reqwest::Method;
use tracing::info;

use super::{validate_id, ApiClient, Checks, PIPELINE_TIMEOUT};
use crate::error::ApiError;
use crate::models::{Config, ConfigHistory, SaveConfigRequest, SaveReceipt};

const CONFS: &str = "confs";
const KIND: &str = "config";

impl ApiClient {
    /// Fetch one config.
    pub async fn get_config(&self, config_id: &str) -> Result<Config, ApiError> {
        validate_id(KIND, config_id)?;
        self.get(&format!("{}/{}", CONFS, config_id)).await
    }

    /// Fetch every config of the organization.
    pub async fn get_all_configs(&self) -> Result<Vec<Config>, ApiError> {
        self.get(CONFS).await
    }

    /// Create a config; the server assigns its ID.
    pub async fn create_config(&self, config: &Config) -> Result<Config, ApiError> {
        self.fetch(Method::POST, CONFS, Some(config), Checks::strict())
            .await
    }

    /// Replace an existing config, metadata and tag included.
    pub async fn update_config(&self, config_id: &str, config: &Config) -> Result<Config, ApiError> {
        validate_id(KIND, config_id)?;
        self.fetch(
            Method::PUT,
            &format!("{}/{}", CONFS, config_id),
            Some(config),
            Checks::strict(),
        )
        .await
    }

    /// Delete a config.
    pub async fn delete_config(&self, config_id: &str) -> Result<(), ApiError> {
        validate_id(KIND, config_id)?;
        self.delete(&format!("{}/{}", CONFS, config_id)).await
    }

    /// Persist new pipeline content as a draft without deploying it.
    pub async fn save_config(
        &self,
        config_id: &str,
        request: &SaveConfigRequest,
    ) -> Result<SaveReceipt, ApiError> {
        validate_id(KIND, config_id)?;
        self.fetch(
            Method::POST,
            &format!("pipelines/{}/save", config_id),
            Some(request),
            Checks::strict().with_timeout(PIPELINE_TIMEOUT),
        )
        .await
    }

    /// List saved versions of a pipeline, newest first.
    pub async fn get_config_history(&self, config_id: &str) -> Result<Vec<ConfigHistory>, ApiError> {
        validate_id(KIND, config_id)?;
        self.get(&format!("pipelines/{}/history", config_id)).await
    }

    /// Promote the saved version identified by `version` (its history timestamp).
    pub async fn deploy_config(&self, config_id: &str, version: i64) -> Result<(), ApiError> {
        validate_id(KIND, config_id)?;
        self.do_request::<()>(
            Method::POST,
            &format!("pipelines/{}/deploy/{}", config_id, version),
            None,
            Checks::strict()
                .allow_null_body()
                .with_timeout(PIPELINE_TIMEOUT),
        )
        .await?;
        info!(config_id = %config_id, version = version, "Pipeline deployed");
        Ok(())
    }
}
