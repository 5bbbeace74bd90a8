//! Managed resource types.
//!
//! Each resource pairs a [`Schema`] with handlers that translate state into
//! API calls and API responses back into state. The shared pieces live here:
//! the [`Resource`] trait with its default read and delete flows, plus the
//! [`StateReader`] and [`StateBuilder`] helpers.

pub mod config;
pub mod dashboard;
pub mod import;
pub mod monitor;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::{ApiError, ProviderError};
use crate::schema::{Diagnostic, Schema};
use crate::types::ResourceState;
use crate::validation;

pub use config::ConfigResource;
pub use dashboard::DashboardResource;
pub use monitor::MonitorResource;

/// A resource type managed by the provider.
#[async_trait::async_trait]
pub trait Resource: Send + Sync {
    /// The resource type name, e.g. `edgedelta_monitor`.
    fn type_name(&self) -> &'static str;

    /// The entity kind used in messages, e.g. `monitor`.
    fn kind(&self) -> &'static str;

    /// The attribute holding the server-side ID. `id` is the fallback.
    fn id_attribute(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Validate a configuration before any API call.
    fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        validation::validate(&self.schema(), config)
    }

    /// Migrate state written by an older schema version.
    fn upgrade_state(&self, version: i64, state: Value) -> Result<Value, ProviderError> {
        let _ = version;
        Ok(state)
    }

    async fn create(
        &self,
        client: &ApiClient,
        planned: &Value,
    ) -> Result<ResourceState, ProviderError>;

    async fn update(
        &self,
        client: &ApiClient,
        prior: &Value,
        planned: &Value,
    ) -> Result<ResourceState, ProviderError>;

    /// Fetch one instance and render it as state.
    async fn fetch(&self, client: &ApiClient, id: &str) -> Result<ResourceState, ApiError>;

    /// Fetch every instance of the organization.
    async fn fetch_all(&self, client: &ApiClient) -> Result<Vec<ResourceState>, ApiError>;

    /// Issue the API delete for one instance.
    async fn remove(&self, client: &ApiClient, id: &str) -> Result<(), ApiError>;

    /// Refresh state from the API.
    ///
    /// Returns `None` when the instance no longer exists, so the host drops it
    /// from state instead of failing.
    async fn read(
        &self,
        client: &ApiClient,
        current: &Value,
    ) -> Result<Option<ResourceState>, ProviderError> {
        let id = resource_id(current, self.id_attribute(), self.kind())?;
        match self.fetch(client, &id).await {
            Ok(fetched) => Ok(Some(ResourceState {
                state: merge_state(current, fetched.state),
                warnings: fetched.warnings,
            })),
            Err(err) if err.is_not_found() => {
                warn!(resource_type = self.type_name(), id = %id, "Resource no longer exists, removing from state");
                Ok(None)
            },
            Err(err) => Err(ProviderError::api(
                format!("Could not read the {} resource", self.kind()),
                err,
            )),
        }
    }

    /// Delete the instance. An instance that is already gone counts as deleted.
    async fn delete(&self, client: &ApiClient, current: &Value) -> Result<(), ProviderError> {
        let id = resource_id(current, self.id_attribute(), self.kind())?;
        match self.remove(client, &id).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_not_found() => {
                debug!(resource_type = self.type_name(), id = %id, "Resource already deleted");
                Ok(())
            },
            Err(err) => Err(ProviderError::api(
                format!("Could not delete the {} resource", self.kind()),
                err,
            )),
        }
    }
}

/// Resolve the server-side ID of a resource from its state.
///
/// Prefers `id_attribute` and falls back to `id`.
pub fn resource_id(
    state: &Value,
    id_attribute: &str,
    kind: &str,
) -> Result<String, ProviderError> {
    let reader = StateReader::new(state);
    reader
        .non_empty(id_attribute)
        .or_else(|| reader.non_empty("id"))
        .map(str::to_string)
        .ok_or_else(|| {
            ProviderError::InvalidRequest(format!(
                "Cannot determine {} ID: neither '{}' nor 'id' is set in state",
                kind, id_attribute
            ))
        })
}

/// Overlay freshly fetched state onto the current state.
///
/// Fetched state sets every attribute the API backs, null included, so only
/// attributes the API never reports (such as `deploy`) survive from `current`.
pub fn merge_state(current: &Value, fetched: Value) -> Value {
    let mut merged = current.as_object().cloned().unwrap_or_default();
    if let Value::Object(fetched) = fetched {
        merged.extend(fetched);
    }
    Value::Object(merged)
}

/// Typed access to attributes of a state or configuration object.
#[derive(Debug, Clone, Copy)]
pub struct StateReader<'a> {
    value: &'a Value,
}

impl<'a> StateReader<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// A string attribute, empty when unset.
    pub fn string(&self, name: &str) -> String {
        self.value
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// A string attribute, `None` when unset or empty.
    pub fn non_empty(&self, name: &str) -> Option<&'a str> {
        self.value
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        self.value
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// A list of strings, skipping non-string elements.
    pub fn string_list(&self, name: &str) -> Vec<String> {
        self.value
            .get(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Builds a state object and collects warnings for attributes that could not be set.
#[derive(Debug, Default)]
pub struct StateBuilder {
    attributes: Map<String, Value>,
    warnings: Vec<Diagnostic>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing state, keeping its attributes.
    pub fn from_state(base: &Value) -> Self {
        Self {
            attributes: base.as_object().cloned().unwrap_or_default(),
            warnings: Vec::new(),
        }
    }

    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// Set a string attribute reported by the API. Empty becomes null, so a
    /// value cleared on the server also clears the attribute.
    pub fn set_or_null(self, name: &str, value: &str) -> Self {
        if value.is_empty() {
            self.set(name, Value::Null)
        } else {
            self.set(name, value)
        }
    }

    /// Set a string list reported by the API. Empty becomes null.
    pub fn set_list_or_null(self, name: &str, values: &[String]) -> Self {
        if values.is_empty() {
            self.set(name, Value::Null)
        } else {
            self.set(name, values.to_vec())
        }
    }

    pub fn warn(mut self, warning: Diagnostic) -> Self {
        self.warnings.push(warning);
        self
    }

    pub fn build(self) -> ResourceState {
        ResourceState {
            state: Value::Object(self.attributes),
            warnings: self.warnings,
        }
    }
}
