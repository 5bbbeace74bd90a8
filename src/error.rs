//! Error types for the Edge Delta provider.

use thiserror::Error;

/// Errors returned by the Edge Delta API client.
///
/// None of these are retried; each one is surfaced verbatim to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A path ID is not a syntactically valid UUID. No request was sent.
    #[error("failed to validate the {kind} ID: '{id}'")]
    InvalidId {
        /// The entity kind the ID belongs to (e.g. "monitor").
        kind: &'static str,
        /// The rejected ID.
        id: String,
    },

    /// The request URL could not be built from the configured base URL.
    #[error("url parsing error: {source} (base url was '{base_url}')")]
    Url {
        /// The configured API base URL.
        base_url: String,
        /// The underlying parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The request body could not be serialized.
    #[error("failed to marshal the request body: {0}")]
    Marshal(#[source] serde_json::Error),

    /// The HTTP exchange itself failed (connect, TLS, timeout...).
    #[error("failed to do '{method} {path}'. error: {source}")]
    Transport {
        /// HTTP method.
        method: String,
        /// Request path.
        path: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read.
    #[error("failed to read response body from '{path}'. err: {source}")]
    ReadBody {
        /// Request path.
        path: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-2xx status.
    #[error("got non OK http status from: {method} {path}, status: {status}, response: {body:?}")]
    Status {
        /// HTTP method.
        method: String,
        /// Request path.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Verbatim response body.
        body: String,
    },

    /// The API answered 2xx with a literal `null` body.
    #[error("API returned null response body from: {path}, status: {status}, response: {body:?}")]
    NullBody {
        /// Request path.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Verbatim response body.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to unmarshal the response body: {0}")]
    Unmarshal(#[source] serde_json::Error),
}

impl ApiError {
    /// Whether this error means the addressed entity does not exist.
    ///
    /// Matches a 404 status as well as any error text mentioning "not found".
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Status { status: 404, .. } => true,
            other => other.to_string().to_lowercase().contains("not found"),
        }
    }
}

/// Errors that can occur while serving provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A validation error occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A gRPC transport error occurred.
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// Binding or accepting on the server socket failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An Edge Delta API call failed.
    #[error("{summary}: {source}")]
    Api {
        /// Short description of the operation that failed.
        summary: String,
        /// The client error.
        #[source]
        source: ApiError,
    },

    /// A config was saved as a draft but the deploy step did not happen.
    #[error("Config {config_id} was saved but not deployed: {reason}")]
    NotDeployed {
        /// The pipeline config ID.
        config_id: String,
        /// Why the deploy step failed.
        reason: String,
    },

    /// Invalid request from client.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// An internal provider error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProviderError {
    /// Wrap an API error with a short summary of the failed operation.
    pub fn api(summary: impl Into<String>, source: ApiError) -> Self {
        Self::Api {
            summary: summary.into(),
            source,
        }
    }

    /// Get the error message as a string.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Configuration(msg)
            | Self::UnknownResource(msg)
            | Self::InvalidRequest(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::Serialization(err) => err.to_string(),
            Self::Transport(err) => err.to_string(),
            Self::Io(err) => err.to_string(),
            Self::Api { source, .. } => source.to_string(),
            Self::NotDeployed { reason, .. } => reason.clone(),
        }
    }

    /// Short, single-line summary used as the diagnostic headline.
    pub fn summary(&self) -> String {
        match self {
            Self::Api { summary, .. } => summary.clone(),
            Self::NotDeployed { .. } => "Config saved but not deployed".to_string(),
            other => other.to_string(),
        }
    }

    /// Longer explanation used as the diagnostic detail, when there is one.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Api { source, .. } => Some(source.to_string()),
            Self::NotDeployed { config_id, reason } => Some(format!(
                "The new content of config {} is persisted as a draft but is not live. Deploy error: {}",
                config_id, reason
            )),
            _ => None,
        }
    }

    /// Whether this error means the addressed entity does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

impl From<ProviderError> for tonic::Status {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(msg) => tonic::Status::not_found(msg),
            ProviderError::Validation(msg) => tonic::Status::invalid_argument(msg),
            ProviderError::Configuration(msg) => tonic::Status::failed_precondition(msg),
            ProviderError::UnknownResource(msg) => tonic::Status::not_found(msg),
            ProviderError::Serialization(err) => {
                tonic::Status::invalid_argument(format!("Serialization error: {}", err))
            },
            ProviderError::Transport(err) => {
                tonic::Status::unavailable(format!("Transport error: {}", err))
            },
            ProviderError::Io(err) => tonic::Status::unavailable(format!("I/O error: {}", err)),
            err @ ProviderError::Api { .. } => tonic::Status::unknown(err.to_string()),
            err @ ProviderError::NotDeployed { .. } => tonic::Status::aborted(err.to_string()),
            ProviderError::InvalidRequest(msg) => tonic::Status::invalid_argument(msg),
            ProviderError::Internal(msg) => tonic::Status::internal(msg),
        }
    }
}
