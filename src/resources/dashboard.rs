//! `edgedelta_dashboard`: saved dashboards with a JSON definition.

use serde_json::Value;

use super::{resource_id, Resource, StateBuilder, StateReader};
use crate::client::ApiClient;
use crate::error::{ApiError, ProviderError};
use crate::models::Dashboard;
use crate::schema::{Attribute, Diagnostic, Schema, ValueValidator};
use crate::types::ResourceState;

pub const TYPE_NAME: &str = "edgedelta_dashboard";

#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardResource;

impl DashboardResource {
    fn dashboard_from_state(state: &Value) -> Result<Dashboard, ProviderError> {
        let reader = StateReader::new(state);
        Ok(Dashboard {
            dashboard_name: reader.string("dashboard_name"),
            description: reader.string("description"),
            tags: reader.string_list("tags"),
            definition: parse_definition(&reader.string("definition"))?,
            ..Default::default()
        })
    }

    fn write_state(builder: StateBuilder, dashboard: &Dashboard) -> ResourceState {
        let mut builder = builder
            .set("id", dashboard.dashboard_id.as_str())
            .set("dashboard_id", dashboard.dashboard_id.as_str())
            .set("dashboard_name", dashboard.dashboard_name.as_str())
            .set_or_null("description", &dashboard.description)
            .set("creator", dashboard.creator.as_str())
            .set("updater", dashboard.updater.as_str())
            .set("created", dashboard.created.as_str())
            .set("updated", dashboard.updated.as_str())
            .set_list_or_null("tags", &dashboard.tags);

        match &dashboard.definition {
            None | Some(Value::Null) => {
                builder = builder.set("definition", Value::Null);
            },
            Some(definition @ Value::Object(_)) => {
                builder = builder.set("definition", definition.to_string());
            },
            Some(other) => {
                builder = builder.warn(
                    Diagnostic::warning("Failed to set dashboard state")
                        .with_detail(format!(
                            "the definition returned by the API is not a JSON object: {}",
                            other
                        ))
                        .with_attribute("definition"),
                );
            },
        }

        builder.build()
    }
}

/// Parse definition text into the JSON object sent to the API.
///
/// Blank text means no definition.
fn parse_definition(text: &str) -> Result<Option<Value>, ProviderError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Ok(Some(value)),
        Ok(_) => Err(ProviderError::Validation(
            "Invalid definition JSON: expected a JSON object".to_string(),
        )),
        Err(err) => Err(ProviderError::Validation(format!(
            "Invalid definition JSON: {}",
            err
        ))),
    }
}

#[async_trait::async_trait]
impl Resource for DashboardResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn kind(&self) -> &'static str {
        "dashboard"
    }

    fn id_attribute(&self) -> &'static str {
        "dashboard_id"
    }

    fn schema(&self) -> Schema {
        Schema::new(1)
            .with_description("Manages an Edge Delta dashboard resource.")
            .with_attribute(
                "dashboard_name",
                Attribute::required_string().with_description("Name of the dashboard."),
            )
            .with_attribute(
                "description",
                Attribute::optional_string().with_description("Description of the dashboard."),
            )
            .with_attribute(
                "tags",
                Attribute::optional_string_list()
                    .with_description("Searchable tags for the dashboard."),
            )
            .with_attribute(
                "definition",
                Attribute::optional_string()
                    .with_description("Dashboard definition as a JSON string.")
                    .with_validator(ValueValidator::JsonText),
            )
            .with_attribute(
                "dashboard_id",
                Attribute::computed_string()
                    .with_description("Unique identifier for the dashboard."),
            )
            .with_attribute(
                "creator",
                Attribute::computed_string().with_description("User ID who created the dashboard."),
            )
            .with_attribute(
                "updater",
                Attribute::computed_string()
                    .with_description("User ID who last updated the dashboard."),
            )
            .with_attribute(
                "created",
                Attribute::computed_string().with_description("UTC timestamp of dashboard creation."),
            )
            .with_attribute(
                "updated",
                Attribute::computed_string().with_description("UTC timestamp of last update."),
            )
            .with_attribute("id", Attribute::computed_string())
    }

    async fn create(
        &self,
        client: &ApiClient,
        planned: &Value,
    ) -> Result<ResourceState, ProviderError> {
        let dashboard = Self::dashboard_from_state(planned)?;
        let created = client
            .create_dashboard(&dashboard)
            .await
            .map_err(|err| ProviderError::api("Could not create the dashboard resource", err))?;
        Ok(Self::write_state(StateBuilder::from_state(planned), &created))
    }

    async fn update(
        &self,
        client: &ApiClient,
        prior: &Value,
        planned: &Value,
    ) -> Result<ResourceState, ProviderError> {
        let dashboard_id = resource_id(prior, self.id_attribute(), self.kind())?;
        let dashboard = Self::dashboard_from_state(planned)?;
        let updated = client
            .update_dashboard(&dashboard_id, &dashboard)
            .await
            .map_err(|err| ProviderError::api("Could not update the dashboard resource", err))?;
        Ok(Self::write_state(StateBuilder::from_state(planned), &updated))
    }

    async fn fetch(&self, client: &ApiClient, id: &str) -> Result<ResourceState, ApiError> {
        let dashboard = client.get_dashboard(id).await?;
        Ok(Self::write_state(StateBuilder::new(), &dashboard))
    }

    async fn fetch_all(&self, client: &ApiClient) -> Result<Vec<ResourceState>, ApiError> {
        let dashboards = client.get_all_dashboards().await?;
        Ok(dashboards
            .iter()
            .map(|dashboard| Self::write_state(StateBuilder::new(), dashboard))
            .collect())
    }

    async fn remove(&self, client: &ApiClient, id: &str) -> Result<(), ApiError> {
        client.delete_dashboard(id).await
    }
}
