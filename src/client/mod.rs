//! HTTP client for the Edge Delta REST API.
//!
//! Every call targets `{base}/v1/orgs/{org}/{entity}[/{id}]`, carries the API
//! token in the `X-ED-API-Token` header and goes through [`ApiClient::do_request`],
//! which applies the status and null-body checks uniformly.
//!
//! Each call builds its own short-lived HTTP client with a one-connection idle
//! pool, so no keep-alive connection outlives a single operation.

mod config;
mod dashboard;
mod monitor;

use std::fmt;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::ApiError;

/// Header carrying the API secret.
pub const AUTH_HEADER: &str = "X-ED-API-Token";

/// Default API endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.edgedelta.com";

/// Timeout for ordinary CRUD calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for pipeline save and deploy calls.
pub const PIPELINE_TIMEOUT: Duration = Duration::from_secs(60);

const API_VERSION: &str = "v1";

/// Returns true if `val` parses as a UUID.
pub fn is_valid_uuid(val: &str) -> bool {
    uuid::Uuid::parse_str(val).is_ok()
}

/// Fails with [`ApiError::InvalidId`] unless `id` is a UUID.
pub(crate) fn validate_id(kind: &'static str, id: &str) -> Result<(), ApiError> {
    if is_valid_uuid(id) {
        Ok(())
    } else {
        Err(ApiError::InvalidId {
            kind,
            id: id.to_string(),
        })
    }
}

/// Per-call response checks and timeout.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checks {
    ok_status: bool,
    non_null_body: bool,
    timeout: Duration,
}

impl Checks {
    /// Require a 2xx status and a non-null body, with the default timeout.
    pub(crate) fn strict() -> Self {
        Self {
            ok_status: true,
            non_null_body: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub(crate) fn allow_null_body(mut self) -> Self {
        self.non_null_body = false;
        self
    }

    pub(crate) fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for one organization of the Edge Delta API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    org_id: String,
    api_secret: String,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("org_id", &self.org_id)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl ApiClient {
    /// Create a client for `org_id` against `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        org_id: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            org_id: org_id.into(),
            api_secret: api_secret.into(),
        }
    }

    /// The configured API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The organization every request is scoped to.
    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    /// Build the URL for `entity_path` (e.g. `confs/<id>`) under this org.
    ///
    /// Each segment is percent-encoded, so the org ID cannot change the path
    /// structure or add a query.
    pub(crate) fn endpoint(&self, entity_path: &str) -> Result<Url, ApiError> {
        let url_err = |source| ApiError::Url {
            base_url: self.base_url.clone(),
            source,
        };
        let mut url = Url::parse(&self.base_url).map_err(url_err)?;
        url.path_segments_mut()
            .map_err(|()| url_err(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend([API_VERSION, "orgs", self.org_id.as_str()])
            .extend(entity_path.split('/'));
        Ok(url)
    }

    fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(1)
            .user_agent(concat!("terraform-provider-edgedelta/", env!("CARGO_PKG_VERSION")))
            .build()
    }

    /// Send one request and return the raw response body.
    pub(crate) async fn do_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        entity_path: &str,
        body: Option<&B>,
        checks: Checks,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(entity_path)?;
        let path = url.path().to_string();
        let method_name = method.to_string();

        let payload = body
            .map(|b| serde_json::to_vec(b).map_err(ApiError::Marshal))
            .transpose()?;

        let transport_err = |source| ApiError::Transport {
            method: method_name.clone(),
            path: path.clone(),
            source,
        };

        let http = Self::http_client(checks.timeout).map_err(transport_err)?;
        let mut request = http
            .request(method, url)
            .header(AUTH_HEADER, &self.api_secret);
        if let Some(payload) = payload {
            request = request.header(CONTENT_TYPE, "application/json").body(payload);
        }

        debug!(method = %method_name, path = %path, "Sending API request");
        let response = request.send().await.map_err(transport_err)?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::ReadBody {
                path: path.clone(),
                source,
            })?;
        debug!(method = %method_name, path = %path, status = status.as_u16(), bytes = bytes.len(), "API response received");

        let text = String::from_utf8_lossy(&bytes);
        if checks.ok_status && !status.is_success() {
            warn!(method = %method_name, path = %path, status = status.as_u16(), "API returned non-success status");
            return Err(ApiError::Status {
                method: method_name,
                path,
                status: status.as_u16(),
                body: text.into_owned(),
            });
        }
        if checks.non_null_body && text.trim() == "null" {
            return Err(ApiError::NullBody {
                path,
                status: status.as_u16(),
                body: text.into_owned(),
            });
        }

        Ok(bytes.to_vec())
    }

    /// Send a request and decode the response body as `T`.
    pub(crate) async fn fetch<B, T>(
        &self,
        method: Method,
        entity_path: &str,
        body: Option<&B>,
        checks: Checks,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = self.do_request(method, entity_path, body, checks).await?;
        serde_json::from_slice(&bytes).map_err(ApiError::Unmarshal)
    }

    /// GET a JSON document with strict checks.
    pub(crate) async fn get<T: DeserializeOwned>(&self, entity_path: &str) -> Result<T, ApiError> {
        self.fetch::<(), T>(Method::GET, entity_path, None, Checks::strict())
            .await
    }

    /// DELETE an entity; an empty or `null` body is accepted.
    pub(crate) async fn delete(&self, entity_path: &str) -> Result<(), ApiError> {
        self.do_request::<()>(
            Method::DELETE,
            entity_path,
            None,
            Checks::strict().allow_null_body(),
        )
        .await
        .map(|_| ())
    }
}
