//! Wire types for the Edge Delta REST API.
//!
//! These mirror the JSON shapes of the API one to one. Enumerated fields are
//! kept as strings on the wire; the allowed value sets below are enforced by
//! the resource schemas before any request is made.

use serde::{Deserialize, Serialize};

/// Environments a pipeline config can target.
pub const ENVIRONMENTS: &[&str] = &["Kubernetes", "Helm", "Docker", "MacOS", "Linux", "Windows"];

/// The environment that requires a fleet subtype.
pub const KUBERNETES_ENVIRONMENT: &str = "Kubernetes";

/// Fleet types a pipeline config can run on.
pub const FLEET_TYPES: &[&str] = &["Edge", "Cloud"];

/// Fleet subtypes, required for Kubernetes configs.
pub const FLEET_SUBTYPES: &[&str] = &["Edge", "Coordinator", "Gateway"];

/// Monitor (alert definition) types.
pub const MONITOR_TYPES: &[&str] = &[
    "pattern-check",
    "pattern-skyline",
    "correlated-signal",
    "metric-alert",
];

/// A pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Opaque pipeline definition text.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub id: String,
    #[serde(rename = "orgID", default)]
    pub org_id: String,
    /// Version label.
    #[serde(default)]
    pub tag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub environment: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fleet_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fleet_subtype: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_name: String,
}

/// Body of a pipeline save (draft) request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveConfigRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Acknowledgement of a pipeline save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub timestamp: i64,
}

/// One saved version of a pipeline.
///
/// The API lists history newest first, so the first entry is the latest save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigHistory {
    /// Version token used to deploy this entry.
    pub timestamp: i64,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: String,
}

/// An alert definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(rename = "orgID", default)]
    pub org_id: String,
    /// Opaque rule definition.
    #[serde(default)]
    pub payload: String,
    #[serde(rename = "type", default)]
    pub monitor_type: String,
    #[serde(default)]
    pub creator: String,
}

/// A saved dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dashboard_id: String,
    pub dashboard_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Arbitrary JSON layout document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub creator: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updater: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated: String,
}
