//! Provider block configuration.
//!
//! The host sends the `provider "edgedelta"` block as JSON. Attributes left
//! out of the block are looked up in the environment:
//!
//! | attribute      | environment variable      |
//! |----------------|---------------------------|
//! | `org_id`       | `EDGEDELTA_ORG_ID`        |
//! | `api_secret`   | `EDGEDELTA_API_SECRET`    |
//! | `api_endpoint` | `EDGEDELTA_API_ENDPOINT`  |

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::client::{ApiClient, DEFAULT_API_ENDPOINT};
use crate::error::ProviderError;
use crate::schema::{Attribute, Diagnostic, Schema};

/// Environment fallbacks, by attribute name.
pub const ENV_FALLBACKS: &[(&str, &str)] = &[
    ("org_id", "EDGEDELTA_ORG_ID"),
    ("api_secret", "EDGEDELTA_API_SECRET"),
    ("api_endpoint", "EDGEDELTA_API_ENDPOINT"),
];

/// Resolved provider configuration.
#[derive(Clone, Deserialize)]
pub struct ProviderConfig {
    pub org_id: String,
    pub api_secret: String,
    #[serde(default = "default_endpoint")]
    pub api_endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_API_ENDPOINT.to_string()
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("org_id", &self.org_id)
            .field("api_secret", &"<redacted>")
            .field("api_endpoint", &self.api_endpoint)
            .finish()
    }
}

impl ProviderConfig {
    /// The provider block schema.
    pub fn schema() -> Schema {
        Schema::v0()
            .with_attribute(
                "org_id",
                Attribute::required_string().with_description("Unique organization ID"),
            )
            .with_attribute(
                "api_secret",
                Attribute::required_string()
                    .with_description("API secret")
                    .sensitive(),
            )
            .with_attribute(
                "api_endpoint",
                Attribute::optional_string()
                    .with_description("API base URL")
                    .with_default(Value::String(DEFAULT_API_ENDPOINT.to_string())),
            )
    }

    /// Fill attributes that are missing, null or empty from `lookup`.
    ///
    /// Null attributes with no fallback are dropped so serde defaults apply.
    pub fn with_env_fallback<F>(config: &Value, lookup: F) -> Value
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut map: Map<String, Value> = config
            .as_object()
            .map(|obj| {
                obj.iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();

        for (attribute, variable) in ENV_FALLBACKS {
            let unset = map
                .get(*attribute)
                .map_or(true, |v| v.as_str() == Some(""));
            if unset {
                match lookup(variable).filter(|v| !v.is_empty()) {
                    Some(value) => {
                        map.insert(attribute.to_string(), Value::String(value));
                    },
                    None => {
                        map.remove(*attribute);
                    },
                }
            }
        }
        Value::Object(map)
    }

    /// Validate a provider block after environment fallback.
    pub fn validate(resolved: &Value) -> Vec<Diagnostic> {
        let mut diagnostics = crate::validation::validate(&Self::schema(), resolved);
        if let Some(endpoint) = resolved.get("api_endpoint").and_then(Value::as_str) {
            if let Err(reason) = check_endpoint(endpoint) {
                diagnostics.push(
                    Diagnostic::error("Invalid api_endpoint")
                        .with_detail(reason)
                        .with_attribute("api_endpoint"),
                );
            }
        }
        diagnostics
    }

    /// Resolve a provider block against the process environment.
    pub fn from_value(config: &Value) -> Result<Self, ProviderError> {
        Self::from_value_with(config, |name| std::env::var(name).ok())
    }

    /// Resolve a provider block against the given environment lookup.
    pub fn from_value_with<F>(config: &Value, lookup: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolved = Self::with_env_fallback(config, lookup);
        let errors: Vec<String> = Self::validate(&resolved)
            .into_iter()
            .filter(Diagnostic::is_error)
            .map(|d| match d.detail {
                Some(detail) => format!("{}: {}", d.summary, detail),
                None => d.summary,
            })
            .collect();
        if !errors.is_empty() {
            return Err(ProviderError::Configuration(errors.join("; ")));
        }
        Ok(serde_json::from_value(resolved)?)
    }

    /// Build the API client for this configuration.
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.api_endpoint, &self.org_id, &self.api_secret)
    }
}

fn check_endpoint(endpoint: &str) -> Result<(), String> {
    let url = Url::parse(endpoint).map_err(|err| format!("'{}' is not a URL: {}", endpoint, err))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!(
            "'{}' must use http or https, got scheme '{}'",
            endpoint, scheme
        )),
    }
}
