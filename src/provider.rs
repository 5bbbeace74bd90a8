//! The Edge Delta provider: configuration plus dispatch to resource handlers.

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::client::ApiClient;
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::plan;
use crate::resources::import::import_resources;
use crate::resources::{ConfigResource, DashboardResource, MonitorResource, Resource};
use crate::schema::{Diagnostic, ProviderSchema};
use crate::server::ProviderService;
use crate::types::{ImportedResource, PlanResult, ProviderMetadata, ResourceState, ServerCapabilities};

/// Provider for Edge Delta configs, monitors and dashboards.
pub struct EdgeDeltaProvider {
    client: RwLock<Option<ApiClient>>,
    resources: Vec<Box<dyn Resource>>,
}

impl Default for EdgeDeltaProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeDeltaProvider {
    /// Create an unconfigured provider.
    pub fn new() -> Self {
        Self {
            client: RwLock::new(None),
            resources: vec![
                Box::new(ConfigResource),
                Box::new(MonitorResource),
                Box::new(DashboardResource),
            ],
        }
    }

    /// Create a provider that is already configured with `client`.
    pub fn with_client(client: ApiClient) -> Self {
        Self {
            client: RwLock::new(Some(client)),
            ..Self::new()
        }
    }

    fn resource(&self, resource_type: &str) -> Result<&dyn Resource, ProviderError> {
        self.resources
            .iter()
            .find(|r| r.type_name() == resource_type)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))
    }

    async fn client(&self) -> Result<ApiClient, ProviderError> {
        self.client.read().await.clone().ok_or_else(|| {
            ProviderError::Configuration(
                "the provider has not been configured; call Configure first".to_string(),
            )
        })
    }

    fn ensure_valid(resource: &dyn Resource, state: &Value) -> Result<(), ProviderError> {
        let errors: Vec<String> = resource
            .validate(state)
            .into_iter()
            .filter(Diagnostic::is_error)
            .map(|d| match d.detail {
                Some(detail) => format!("{}: {}", d.summary, detail),
                None => d.summary,
            })
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProviderError::Validation(errors.join("; ")))
        }
    }
}

#[async_trait::async_trait]
impl ProviderService for EdgeDeltaProvider {
    fn schema(&self) -> ProviderSchema {
        self.resources.iter().fold(
            ProviderSchema::new().with_provider_config(ProviderConfig::schema()),
            |schema, resource| schema.with_resource(resource.type_name(), resource.schema()),
        )
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            resources: self
                .resources
                .iter()
                .map(|r| r.type_name().to_string())
                .collect(),
            capabilities: ServerCapabilities { plan_destroy: true },
        }
    }

    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let resolved = ProviderConfig::with_env_fallback(&config, |name| std::env::var(name).ok());
        Ok(ProviderConfig::validate(&resolved))
    }

    #[instrument(skip(self, config))]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let config = ProviderConfig::from_value(&config)?;
        info!(org_id = %config.org_id, api_endpoint = %config.api_endpoint, "Provider configured");
        *self.client.write().await = Some(config.client());
        Ok(vec![])
    }

    async fn stop(&self) -> Result<(), ProviderError> {
        self.client.write().await.take();
        debug!("Provider stopped, API client released");
        Ok(())
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(self.resource(resource_type)?.validate(&config))
    }

    async fn upgrade_resource_state(
        &self,
        resource_type: &str,
        version: i64,
        state: Value,
    ) -> Result<Value, ProviderError> {
        self.resource(resource_type)?.upgrade_state(version, state)
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        _config: Value,
    ) -> Result<PlanResult, ProviderError> {
        let resource = self.resource(resource_type)?;
        Ok(plan::plan(
            &resource.schema(),
            prior_state.as_ref(),
            &proposed_state,
        ))
    }

    async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<ResourceState, ProviderError> {
        let resource = self.resource(resource_type)?;
        Self::ensure_valid(resource, &planned_state)?;
        let client = self.client().await?;
        resource.create(&client, &planned_state).await
    }

    async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Option<ResourceState>, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        resource.read(&client, &current_state).await
    }

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<ResourceState, ProviderError> {
        let resource = self.resource(resource_type)?;
        Self::ensure_valid(resource, &planned_state)?;
        let client = self.client().await?;
        resource.update(&client, &prior_state, &planned_state).await
    }

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        resource.delete(&client, &current_state).await
    }

    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        import_resources(resource, &client, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_lists_every_resource() {
        let schema = EdgeDeltaProvider::new().schema();
        let names: Vec<_> = schema.resources.keys().cloned().collect();
        assert_eq!(
            names,
            vec!["edgedelta_config", "edgedelta_dashboard", "edgedelta_monitor"]
        );
        assert!(schema.resources.values().all(|s| s.version == 1));
        assert!(schema.provider.attribute("api_secret").unwrap().flags.sensitive);
    }

    #[test]
    fn test_metadata_supports_plan_destroy() {
        let metadata = EdgeDeltaProvider::new().metadata();
        assert_eq!(metadata.resources.len(), 3);
        assert!(metadata.capabilities.plan_destroy);
    }

    #[tokio::test]
    async fn test_operations_require_configure() {
        let provider = EdgeDeltaProvider::new();
        let err = provider
            .read("edgedelta_monitor", json!({"id": "550e8400-e29b-41d4-a716-446655440000"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unknown_resource_type() {
        let provider = EdgeDeltaProvider::with_client(ApiClient::new(
            "http://127.0.0.1:9",
            "org",
            "secret",
        ));
        let err = provider
            .delete("edgedelta_widget", json!({"id": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));
    }

    #[tokio::test]
    async fn test_invalid_planned_state_fails_before_io() {
        let provider = EdgeDeltaProvider::with_client(ApiClient::new(
            "http://127.0.0.1:9",
            "org",
            "secret",
        ));
        let err = provider
            .create(
                "edgedelta_monitor",
                json!({
                    "name": "errors",
                    "type": "threshold",
                    "enabled": true,
                    "payload": "{}",
                    "creator": "ops@example.com"
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
    }

    #[tokio::test]
    async fn test_configure_then_stop() {
        let provider = EdgeDeltaProvider::new();
        let diagnostics = provider
            .configure(json!({
                "org_id": "org",
                "api_secret": "secret",
                "api_endpoint": "http://127.0.0.1:9"
            }))
            .await
            .unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(provider.client().await.unwrap().org_id(), "org");

        provider.stop().await.unwrap();
        assert!(provider.client().await.is_err());
    }
}
