//! Edge Delta infrastructure provider
//!
//! Manages Edge Delta pipeline configurations, monitors and dashboards
//! through the Edge Delta REST API, and serves them to an infrastructure
//! host over a gRPC plugin protocol.
//!
//! # Overview
//!
//! - **API client** ([`client`]): typed calls for configs, monitors and
//!   dashboards, including the pipeline save and deploy flow
//! - **Resources** ([`resources`]): `edgedelta_config`, `edgedelta_monitor`
//!   and `edgedelta_dashboard`, each with a schema, CRUD and import
//! - **Provider** ([`EdgeDeltaProvider`]): the [`ProviderService`]
//!   implementation dispatching protocol calls to resources
//! - **Server** ([`serve`]): gRPC server with the handshake protocol
//!
//! # Handshake Protocol
//!
//! On startup the provider prints one line to stdout:
//!
//! ```text
//! EDGEDELTA_PROVIDER|1|127.0.0.1:50051
//! ```
//!
//! Format: `EDGEDELTA_PROVIDER|<protocol_version>|<address>`. The host reads
//! it to connect to the spawned provider process.
//!
//! # Quick Start
//!
//! ```ignore
//! use edgedelta_provider::{serve, EdgeDeltaProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     edgedelta_provider::init_logging();
//!     serve(EdgeDeltaProvider::new()).await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod plan;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod server;
pub mod testing;
pub mod types;
pub mod validation;

#[allow(missing_docs)]
#[allow(clippy::all)]
pub mod generated {
    tonic::include_proto!("edgedelta.provider.v1");
}

// Re-export main types at crate root
pub use client::ApiClient;
pub use config::ProviderConfig;
pub use error::{ApiError, ProviderError};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::EdgeDeltaProvider;
pub use schema::ProviderSchema;
pub use server::{
    serve, serve_on, serve_on_with_options, serve_with_options, ProviderService, ServeOptions,
};
pub use types::{
    AttributeChange, ImportedResource, PlanResult, ProviderMetadata, ResourceState,
    ServerCapabilities, HANDSHAKE_PREFIX, PROTOCOL_VERSION,
};
pub use validation::{is_valid, validate, validate_result};

pub use async_trait::async_trait;
pub use serde_json;
