//! `edgedelta_monitor`: alert definitions.

use serde_json::Value;

use super::{resource_id, Resource, StateBuilder, StateReader};
use crate::client::ApiClient;
use crate::error::{ApiError, ProviderError};
use crate::models::{Monitor, MONITOR_TYPES};
use crate::schema::{Attribute, Schema, ValueValidator};
use crate::types::ResourceState;

pub const TYPE_NAME: &str = "edgedelta_monitor";

#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorResource;

impl MonitorResource {
    fn monitor_from_state(state: &Value) -> Monitor {
        let reader = StateReader::new(state);
        Monitor {
            enabled: reader.bool_or("enabled", false),
            name: reader.string("name"),
            payload: reader.string("payload"),
            monitor_type: reader.string("type"),
            creator: reader.string("creator"),
            ..Default::default()
        }
    }

    fn write_state(builder: StateBuilder, monitor: &Monitor) -> ResourceState {
        builder
            .set("id", monitor.id.as_str())
            .set("monitor_id", monitor.id.as_str())
            .set("org_id", monitor.org_id.as_str())
            .set("name", monitor.name.as_str())
            .set("type", monitor.monitor_type.as_str())
            .set("enabled", monitor.enabled)
            .set("payload", monitor.payload.as_str())
            .set_or_null("creator", &monitor.creator)
            .build()
    }
}

#[async_trait::async_trait]
impl Resource for MonitorResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn kind(&self) -> &'static str {
        "monitor"
    }

    fn id_attribute(&self) -> &'static str {
        "monitor_id"
    }

    fn schema(&self) -> Schema {
        Schema::new(1)
            .with_description("Manages an Edge Delta monitor (alert definition).")
            .with_attribute(
                "name",
                Attribute::required_string().with_description("Monitor name"),
            )
            .with_attribute(
                "type",
                Attribute::required_string()
                    .with_description("Monitor type")
                    .with_validator(ValueValidator::one_of(MONITOR_TYPES)),
            )
            .with_attribute(
                "enabled",
                Attribute::required_bool().with_description("Monitor enabled flag"),
            )
            .with_attribute(
                "payload",
                Attribute::required_string().with_description("Monitor payload"),
            )
            .with_attribute(
                "creator",
                Attribute::required_string().with_description("Monitor creator (email)"),
            )
            .with_attribute(
                "monitor_id",
                Attribute::optional_computed_string()
                    .with_description("Unique monitor ID. Set it to adopt an existing monitor.")
                    .with_validator(ValueValidator::Uuid),
            )
            .with_attribute(
                "org_id",
                Attribute::computed_string().with_description("Organization ID"),
            )
            .with_attribute("id", Attribute::computed_string())
    }

    async fn create(
        &self,
        client: &ApiClient,
        planned: &Value,
    ) -> Result<ResourceState, ProviderError> {
        let monitor = Self::monitor_from_state(planned);
        let created = match StateReader::new(planned).non_empty("monitor_id") {
            None => client
                .create_monitor(&monitor)
                .await
                .map_err(|err| ProviderError::api("Could not create the monitor resource", err))?,
            Some(monitor_id) => client
                .update_monitor(monitor_id, &monitor)
                .await
                .map_err(|err| {
                    ProviderError::api(
                        "Could not update the monitor resource (create=>update)",
                        err,
                    )
                })?,
        };
        Ok(Self::write_state(StateBuilder::from_state(planned), &created))
    }

    async fn update(
        &self,
        client: &ApiClient,
        prior: &Value,
        planned: &Value,
    ) -> Result<ResourceState, ProviderError> {
        let monitor_id = resource_id(planned, "monitor_id", self.kind())
            .or_else(|_| resource_id(prior, "monitor_id", self.kind()))?;
        let updated = client
            .update_monitor(&monitor_id, &Self::monitor_from_state(planned))
            .await
            .map_err(|err| ProviderError::api("Could not update the monitor resource", err))?;
        Ok(Self::write_state(StateBuilder::from_state(planned), &updated))
    }

    async fn fetch(&self, client: &ApiClient, id: &str) -> Result<ResourceState, ApiError> {
        let monitor = client.get_monitor(id).await?;
        Ok(Self::write_state(StateBuilder::new(), &monitor))
    }

    async fn fetch_all(&self, client: &ApiClient) -> Result<Vec<ResourceState>, ApiError> {
        let monitors = client.get_all_monitors().await?;
        Ok(monitors
            .iter()
            .map(|monitor| Self::write_state(StateBuilder::new(), monitor))
            .collect())
    }

    async fn remove(&self, client: &ApiClient, id: &str) -> Result<(), ApiError> {
        client.delete_monitor(id).await
    }
}
