//! Import of existing API objects into state.
//!
//! An import ID is either `*` (every instance of the organization), a
//! comma-separated list of IDs, or a single ID.

use tracing::info;

use super::Resource;
use crate::client::{is_valid_uuid, ApiClient};
use crate::error::ProviderError;
use crate::types::ImportedResource;

/// A parsed import ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportId {
    /// Import every instance.
    All,
    /// Import the listed instances, in order.
    Ids(Vec<String>),
}

impl ImportId {
    pub fn parse(raw: &str) -> Result<Self, ProviderError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ProviderError::InvalidRequest(
                "could not determine the resource ID - possibly the ID was not set".to_string(),
            ));
        }
        if raw == "*" {
            return Ok(Self::All);
        }
        let ids = raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        if ids.is_empty() {
            return Err(ProviderError::InvalidRequest(format!(
                "import ID '{}' does not name any resource",
                raw
            )));
        }
        Ok(Self::Ids(ids))
    }
}

/// Fetch the instances named by `raw_id` and turn each into an imported state.
///
/// The first failing ID aborts the whole import.
pub async fn import_resources(
    resource: &dyn Resource,
    client: &ApiClient,
    raw_id: &str,
) -> Result<Vec<ImportedResource>, ProviderError> {
    let states = match ImportId::parse(raw_id)? {
        ImportId::All => resource.fetch_all(client).await.map_err(|err| {
            ProviderError::api(format!("Could not get the {}s from API", resource.kind()), err)
        })?,
        ImportId::Ids(ids) => {
            let mut states = Vec::with_capacity(ids.len());
            for id in ids {
                let state = resource.fetch(client, &id).await.map_err(|err| {
                    ProviderError::api(
                        format!(
                            "Could not import the {} resource (resource ID was: '{}')",
                            resource.kind(),
                            id
                        ),
                        err,
                    )
                })?;
                states.push(state);
            }
            states
        },
    };

    let mut imported = Vec::with_capacity(states.len());
    for fetched in states {
        let id = fetched.state.get("id").and_then(|v| v.as_str()).unwrap_or_default();
        if !is_valid_uuid(id) {
            return Err(ProviderError::Validation(format!(
                "imported {} has an invalid ID: '{}'",
                resource.kind(),
                id
            )));
        }
        imported.push(ImportedResource::new(resource.type_name(), fetched.state));
    }

    info!(
        resource_type = resource.type_name(),
        count = imported.len(),
        "Imported resources"
    );
    Ok(imported)
}
