//! gRPC server for the provider protocol.
//!
//! [`ProviderService`] is the Rust-side API the provider implements; the
//! private adapter below maps it onto the generated `Provider` service,
//! decoding and encoding the JSON payloads and turning errors into
//! diagnostics.
//!
//! # Signal Handling
//!
//! On SIGTERM or SIGINT the server stops accepting connections, waits for
//! in-flight requests up to [`ServeOptions::shutdown_timeout`], then calls
//! [`ProviderService::stop`].

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::net::TcpListener;
use tonic::transport::Server;
use tracing::{debug, error, info, instrument, warn};

use crate::error::ProviderError;
use crate::generated;
use crate::schema::{Diagnostic, DiagnosticSeverity, ProviderSchema};
use crate::types::{
    ImportedResource, PlanResult, ProviderMetadata, ResourceState, HANDSHAKE_PREFIX,
    PROTOCOL_VERSION,
};

/// The operations a provider serves.
#[async_trait::async_trait]
pub trait ProviderService: Send + Sync + 'static {
    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    /// Return the provider's schema including all resources.
    fn schema(&self) -> ProviderSchema;

    /// Return provider metadata. By default, this is derived from the schema.
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            resources: self.schema().resources.keys().cloned().collect(),
            capabilities: Default::default(),
        }
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Validate the provider configuration before configuring.
    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = config;
        Ok(vec![])
    }

    /// Configure the provider with credentials and settings.
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError>;

    /// Stop the provider gracefully.
    async fn stop(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate a resource's configuration before planning.
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = (resource_type, config);
        Ok(vec![])
    }

    /// Upgrade resource state from an older schema version.
    async fn upgrade_resource_state(
        &self,
        resource_type: &str,
        version: i64,
        state: Value,
    ) -> Result<Value, ProviderError> {
        let _ = (resource_type, version);
        Ok(state)
    }

    /// Plan changes for a resource. `proposed_state` is null when destroying.
    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError>;

    async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<ResourceState, ProviderError>;

    /// Read the current state of a resource; `None` drops it from state.
    async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Option<ResourceState>, ProviderError>;

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<ResourceState, ProviderError>;

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError>;

    /// Import existing objects. `id` may be a single ID, a comma-separated list or `*`.
    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        let _ = id;
        Err(ProviderError::InvalidRequest(format!(
            "Import not supported for resource type: {}",
            resource_type
        )))
    }
}

/// Adapter implementing the generated gRPC trait.
struct ProviderGrpcService<P: ProviderService> {
    provider: Arc<P>,
}

fn diagnostics_to_proto(diagnostics: Vec<Diagnostic>) -> Vec<generated::Diagnostic> {
    diagnostics
        .into_iter()
        .map(|d| generated::Diagnostic {
            severity: match d.severity {
                DiagnosticSeverity::Error => generated::diagnostic::Severity::Error as i32,
                DiagnosticSeverity::Warning => generated::diagnostic::Severity::Warning as i32,
            },
            summary: d.summary,
            detail: d.detail.unwrap_or_default(),
            attribute: d.attribute.unwrap_or_default(),
        })
        .collect()
}

fn error_to_diagnostics(err: &ProviderError) -> Vec<generated::Diagnostic> {
    let mut diagnostic = Diagnostic::error(err.summary());
    if let Some(detail) = err.detail() {
        diagnostic = diagnostic.with_detail(detail);
    }
    diagnostics_to_proto(vec![diagnostic])
}

fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// Decode a JSON payload. Empty bytes decode as null.
fn decode(bytes: &[u8]) -> Result<Value, tonic::Status> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|err| ProviderError::from(err).into())
}

fn encode(value: &Value) -> Result<Vec<u8>, tonic::Status> {
    serde_json::to_vec(value).map_err(|err| ProviderError::from(err).into())
}

fn schema_to_proto(schema: &crate::schema::Schema) -> Result<generated::Schema, tonic::Status> {
    let attributes = schema
        .block
        .attributes
        .iter()
        .map(|(name, attr)| {
            let validators = if attr.validators.is_empty() {
                Vec::new()
            } else {
                serde_json::to_vec(&attr.validators).map_err(ProviderError::from)?
            };
            Ok(generated::Attribute {
                name: name.clone(),
                r#type: serde_json::to_vec(&attr.attr_type).map_err(ProviderError::from)?,
                required: attr.flags.required,
                optional: attr.flags.optional,
                computed: attr.flags.computed,
                sensitive: attr.flags.sensitive,
                description: attr.description.clone().unwrap_or_default(),
                default_value: match &attr.default {
                    Some(v) => serde_json::to_vec(v).map_err(ProviderError::from)?,
                    None => Vec::new(),
                },
                validators,
            })
        })
        .collect::<Result<Vec<_>, ProviderError>>()?;

    Ok(generated::Schema {
        version: schema.version as i64,
        block: Some(generated::Block {
            attributes,
            description: schema.block.description.clone().unwrap_or_default(),
        }),
    })
}

#[tonic::async_trait]
impl<P: ProviderService> generated::provider_server::Provider for ProviderGrpcService<P> {
    #[instrument(skip(self, _request), name = "grpc.get_metadata")]
    async fn get_metadata(
        &self,
        _request: tonic::Request<generated::GetMetadataRequest>,
    ) -> Result<tonic::Response<generated::GetMetadataResponse>, tonic::Status> {
        let metadata = self.provider.metadata();
        info!(resources = metadata.resources.len(), "GetMetadata completed");
        Ok(tonic::Response::new(generated::GetMetadataResponse {
            server_capabilities: Some(generated::ServerCapabilities {
                plan_destroy: metadata.capabilities.plan_destroy,
            }),
            resources: metadata.resources,
            diagnostics: vec![],
        }))
    }

    #[instrument(skip(self, _request), name = "grpc.get_schema")]
    async fn get_schema(
        &self,
        _request: tonic::Request<generated::GetSchemaRequest>,
    ) -> Result<tonic::Response<generated::GetSchemaResponse>, tonic::Status> {
        let schema = self.provider.schema();
        let resources = schema
            .resources
            .iter()
            .map(|(name, s)| Ok((name.clone(), schema_to_proto(s)?)))
            .collect::<Result<_, tonic::Status>>()?;
        info!(resources = schema.resources.len(), "GetSchema completed");
        Ok(tonic::Response::new(generated::GetSchemaResponse {
            provider: Some(schema_to_proto(&schema.provider)?),
            resources,
            diagnostics: vec![],
        }))
    }

    #[instrument(skip(self, request), name = "grpc.validate_provider_config")]
    async fn validate_provider_config(
        &self,
        request: tonic::Request<generated::ValidateProviderConfigRequest>,
    ) -> Result<tonic::Response<generated::ValidateProviderConfigResponse>, tonic::Status> {
        let config = decode(&request.into_inner().config)?;

        let diagnostics = match self.provider.validate_provider_config(config).await {
            Ok(diagnostics) => {
                if has_errors(&diagnostics) {
                    warn!(diagnostics = diagnostics.len(), "ValidateProviderConfig completed with errors");
                } else {
                    debug!("ValidateProviderConfig completed successfully");
                }
                diagnostics_to_proto(diagnostics)
            },
            Err(e) => {
                error!(error = %e, "ValidateProviderConfig failed");
                error_to_diagnostics(&e)
            },
        };
        Ok(tonic::Response::new(
            generated::ValidateProviderConfigResponse { diagnostics },
        ))
    }

    #[instrument(skip(self, request), name = "grpc.configure")]
    async fn configure(
        &self,
        request: tonic::Request<generated::ConfigureRequest>,
    ) -> Result<tonic::Response<generated::ConfigureResponse>, tonic::Status> {
        let config = decode(&request.into_inner().config)?;

        let diagnostics = match self.provider.configure(config).await {
            Ok(diagnostics) => {
                if has_errors(&diagnostics) {
                    warn!(diagnostics = diagnostics.len(), "Configure completed with errors");
                } else {
                    info!("Configure completed successfully");
                }
                diagnostics_to_proto(diagnostics)
            },
            Err(e) => {
                error!(error = %e, "Configure failed");
                error_to_diagnostics(&e)
            },
        };
        Ok(tonic::Response::new(generated::ConfigureResponse {
            diagnostics,
        }))
    }

    #[instrument(skip(self, _request), name = "grpc.stop")]
    async fn stop(
        &self,
        _request: tonic::Request<generated::StopRequest>,
    ) -> Result<tonic::Response<generated::StopResponse>, tonic::Status> {
        info!("Stop called");
        let error = match self.provider.stop().await {
            Ok(()) => String::new(),
            Err(e) => {
                error!(error = %e, "Stop failed");
                e.to_string()
            },
        };
        Ok(tonic::Response::new(generated::StopResponse { error }))
    }

    #[instrument(skip(self, request), name = "grpc.validate_resource_config")]
    async fn validate_resource_config(
        &self,
        request: tonic::Request<generated::ValidateResourceConfigRequest>,
    ) -> Result<tonic::Response<generated::ValidateResourceConfigResponse>, tonic::Status> {
        let req = request.into_inner();
        let config = decode(&req.config)?;

        let diagnostics = match self
            .provider
            .validate_resource_config(&req.resource_type, config)
            .await
        {
            Ok(diagnostics) => {
                if has_errors(&diagnostics) {
                    warn!(resource_type = %req.resource_type, diagnostics = diagnostics.len(), "ValidateResourceConfig completed with errors");
                } else {
                    debug!(resource_type = %req.resource_type, "ValidateResourceConfig completed successfully");
                }
                diagnostics_to_proto(diagnostics)
            },
            Err(e) => {
                error!(resource_type = %req.resource_type, error = %e, "ValidateResourceConfig failed");
                error_to_diagnostics(&e)
            },
        };
        Ok(tonic::Response::new(
            generated::ValidateResourceConfigResponse { diagnostics },
        ))
    }

    #[instrument(skip(self, request), name = "grpc.upgrade_resource_state")]
    async fn upgrade_resource_state(
        &self,
        request: tonic::Request<generated::UpgradeResourceStateRequest>,
    ) -> Result<tonic::Response<generated::UpgradeResourceStateResponse>, tonic::Status> {
        let req = request.into_inner();
        let state = decode(&req.raw_state)?;

        match self
            .provider
            .upgrade_resource_state(&req.resource_type, req.version, state)
            .await
        {
            Ok(upgraded) => {
                info!(resource_type = %req.resource_type, from_version = req.version, "UpgradeResourceState completed");
                Ok(tonic::Response::new(
                    generated::UpgradeResourceStateResponse {
                        upgraded_state: encode(&upgraded)?,
                        diagnostics: vec![],
                    },
                ))
            },
            Err(e) => {
                error!(resource_type = %req.resource_type, version = req.version, error = %e, "UpgradeResourceState failed");
                Ok(tonic::Response::new(
                    generated::UpgradeResourceStateResponse {
                        upgraded_state: vec![],
                        diagnostics: error_to_diagnostics(&e),
                    },
                ))
            },
        }
    }

    #[instrument(skip(self, request), name = "grpc.plan")]
    async fn plan(
        &self,
        request: tonic::Request<generated::PlanRequest>,
    ) -> Result<tonic::Response<generated::PlanResponse>, tonic::Status> {
        let req = request.into_inner();
        let prior_state = if req.prior_state.is_empty() {
            None
        } else {
            Some(decode(&req.prior_state)?).filter(|v| !v.is_null())
        };
        let proposed_state = decode(&req.proposed_state)?;
        let config = decode(&req.config)?;
        debug!(resource_type = %req.resource_type, is_create = prior_state.is_none(), "Plan called");

        match self
            .provider
            .plan(&req.resource_type, prior_state, proposed_state, config)
            .await
        {
            Ok(result) => {
                info!(resource_type = %req.resource_type, changes = result.changes.len(), "Plan completed");
                Ok(tonic::Response::new(generated::PlanResponse {
                    planned_state: encode(&result.planned_state)?,
                    changes: result.changes.into_iter().map(Into::into).collect(),
                    diagnostics: vec![],
                }))
            },
            Err(e) => {
                error!(resource_type = %req.resource_type, error = %e, "Plan failed");
                Ok(tonic::Response::new(generated::PlanResponse {
                    planned_state: vec![],
                    changes: vec![],
                    diagnostics: error_to_diagnostics(&e),
                }))
            },
        }
    }

    #[instrument(skip(self, request), name = "grpc.create")]
    async fn create(
        &self,
        request: tonic::Request<generated::CreateRequest>,
    ) -> Result<tonic::Response<generated::CreateResponse>, tonic::Status> {
        let req = request.into_inner();
        info!(resource_type = %req.resource_type, "Create called");
        let planned_state = decode(&req.planned_state)?;

        match self.provider.create(&req.resource_type, planned_state).await {
            Ok(written) => {
                info!(resource_type = %req.resource_type, warnings = written.warnings.len(), "Create completed successfully");
                Ok(tonic::Response::new(generated::CreateResponse {
                    state: encode(&written.state)?,
                    diagnostics: diagnostics_to_proto(written.warnings),
                }))
            },
            Err(e) => {
                error!(resource_type = %req.resource_type, error = %e, "Create failed");
                Ok(tonic::Response::new(generated::CreateResponse {
                    state: vec![],
                    diagnostics: error_to_diagnostics(&e),
                }))
            },
        }
    }

    #[instrument(skip(self, request), name = "grpc.read")]
    async fn read(
        &self,
        request: tonic::Request<generated::ReadRequest>,
    ) -> Result<tonic::Response<generated::ReadResponse>, tonic::Status> {
        let req = request.into_inner();
        debug!(resource_type = %req.resource_type, "Read called");
        let current_state = decode(&req.current_state)?;

        match self.provider.read(&req.resource_type, current_state).await {
            Ok(Some(written)) => Ok(tonic::Response::new(generated::ReadResponse {
                state: encode(&written.state)?,
                diagnostics: diagnostics_to_proto(written.warnings),
            })),
            Ok(None) => {
                info!(resource_type = %req.resource_type, "Resource is gone, dropping it from state");
                Ok(tonic::Response::new(generated::ReadResponse {
                    state: vec![],
                    diagnostics: vec![],
                }))
            },
            Err(e) => {
                error!(resource_type = %req.resource_type, error = %e, "Read failed");
                Ok(tonic::Response::new(generated::ReadResponse {
                    state: vec![],
                    diagnostics: error_to_diagnostics(&e),
                }))
            },
        }
    }

    #[instrument(skip(self, request), name = "grpc.update")]
    async fn update(
        &self,
        request: tonic::Request<generated::UpdateRequest>,
    ) -> Result<tonic::Response<generated::UpdateResponse>, tonic::Status> {
        let req = request.into_inner();
        info!(resource_type = %req.resource_type, "Update called");
        let prior_state = decode(&req.prior_state)?;
        let planned_state = decode(&req.planned_state)?;

        match self
            .provider
            .update(&req.resource_type, prior_state, planned_state)
            .await
        {
            Ok(written) => {
                info!(resource_type = %req.resource_type, warnings = written.warnings.len(), "Update completed successfully");
                Ok(tonic::Response::new(generated::UpdateResponse {
                    state: encode(&written.state)?,
                    diagnostics: diagnostics_to_proto(written.warnings),
                }))
            },
            Err(e) => {
                error!(resource_type = %req.resource_type, error = %e, "Update failed");
                Ok(tonic::Response::new(generated::UpdateResponse {
                    state: vec![],
                    diagnostics: error_to_diagnostics(&e),
                }))
            },
        }
    }

    #[instrument(skip(self, request), name = "grpc.delete")]
    async fn delete(
        &self,
        request: tonic::Request<generated::DeleteRequest>,
    ) -> Result<tonic::Response<generated::DeleteResponse>, tonic::Status> {
        let req = request.into_inner();
        info!(resource_type = %req.resource_type, "Delete called");
        let current_state = decode(&req.current_state)?;

        let diagnostics = match self.provider.delete(&req.resource_type, current_state).await {
            Ok(()) => {
                info!(resource_type = %req.resource_type, "Delete completed successfully");
                vec![]
            },
            Err(e) => {
                error!(resource_type = %req.resource_type, error = %e, "Delete failed");
                error_to_diagnostics(&e)
            },
        };
        Ok(tonic::Response::new(generated::DeleteResponse {
            diagnostics,
        }))
    }

    #[instrument(skip(self, request), name = "grpc.import_resource_state")]
    async fn import_resource_state(
        &self,
        request: tonic::Request<generated::ImportResourceStateRequest>,
    ) -> Result<tonic::Response<generated::ImportResourceStateResponse>, tonic::Status> {
        let req = request.into_inner();
        info!(resource_type = %req.resource_type, id = %req.id, "ImportResourceState called");

        match self
            .provider
            .import_resource(&req.resource_type, &req.id)
            .await
        {
            Ok(imported) => {
                info!(resource_type = %req.resource_type, imported_count = imported.len(), "ImportResourceState completed");
                let imported = imported
                    .into_iter()
                    .map(|r| {
                        Ok(generated::ImportedResource {
                            state: encode(&r.state)?,
                            resource_type: r.resource_type,
                        })
                    })
                    .collect::<Result<_, tonic::Status>>()?;
                Ok(tonic::Response::new(
                    generated::ImportResourceStateResponse {
                        imported,
                        diagnostics: vec![],
                    },
                ))
            },
            Err(e) => {
                error!(resource_type = %req.resource_type, id = %req.id, error = %e, "ImportResourceState failed");
                Ok(tonic::Response::new(
                    generated::ImportResourceStateResponse {
                        imported: vec![],
                        diagnostics: error_to_diagnostics(&e),
                    },
                ))
            },
        }
    }
}

/// Options for configuring the provider server.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// How long to wait for in-flight requests after a shutdown signal.
    /// Default: 30 seconds.
    pub shutdown_timeout: Duration,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ServeOptions {
    /// Create new serve options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shutdown timeout.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

/// Wait for SIGTERM or SIGINT (CTRL+C on Windows).
///
/// If the handlers cannot be installed, this never returns and the server
/// runs until the host kills it.
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                (Err(e), _) | (_, Err(e)) => {
                    error!(error = %e, "Failed to install signal handlers");
                    return std::future::pending::<()>().await;
                },
            };

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, initiating graceful shutdown"),
            _ = sigint.recv() => info!("Received SIGINT, initiating graceful shutdown"),
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install CTRL+C handler");
            return std::future::pending::<()>().await;
        }
        info!("Received CTRL+C, initiating graceful shutdown");
    }

    #[cfg(not(any(unix, windows)))]
    {
        std::future::pending::<()>().await;
    }
}

/// Serve a provider on an ephemeral localhost port.
///
/// Prints the handshake `EDGEDELTA_PROVIDER|<version>|<address>` on stdout,
/// then serves until a shutdown signal arrives.
pub async fn serve<P: ProviderService>(provider: P) -> Result<(), ProviderError> {
    serve_with_options(provider, ServeOptions::default()).await
}

/// Serve a provider on an ephemeral localhost port with custom options.
pub async fn serve_with_options<P: ProviderService>(
    provider: P,
    options: ServeOptions,
) -> Result<(), ProviderError> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    serve_on_listener(provider, listener, options, wait_for_shutdown_signal()).await
}

/// Serve a provider on a specific address.
pub async fn serve_on<P: ProviderService>(
    provider: P,
    addr: SocketAddr,
) -> Result<(), ProviderError> {
    serve_on_with_options(provider, addr, ServeOptions::default()).await
}

/// Serve a provider on a specific address with custom options.
pub async fn serve_on_with_options<P: ProviderService>(
    provider: P,
    addr: SocketAddr,
    options: ServeOptions,
) -> Result<(), ProviderError> {
    let listener = TcpListener::bind(addr).await?;
    serve_on_listener(provider, listener, options, wait_for_shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
async fn serve_on_listener<P, F>(
    provider: P,
    listener: TcpListener,
    options: ServeOptions,
    shutdown: F,
) -> Result<(), ProviderError>
where
    P: ProviderService,
    F: std::future::Future<Output = ()> + Send,
{
    let addr = listener.local_addr()?;
    println!("{}|{}|{}", HANDSHAKE_PREFIX, PROTOCOL_VERSION, addr);
    info!(address = %addr, "Provider server starting");

    let provider = Arc::new(provider);
    let service = generated::provider_server::ProviderServer::new(ProviderGrpcService {
        provider: Arc::clone(&provider),
    });

    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let server = Server::builder().add_service(service).serve_with_incoming_shutdown(
        tokio_stream::wrappers::TcpListenerStream::new(listener),
        async move {
            shutdown.await;
            let _ = signalled_tx.send(());
        },
    );
    tokio::pin!(server);

    // The timeout only bounds the drain that follows a shutdown signal.
    let result = tokio::select! {
        result = &mut server => result,
        Ok(()) = signalled_rx => {
            match tokio::time::timeout(options.shutdown_timeout, &mut server).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(timeout = ?options.shutdown_timeout, "Shutdown timeout exceeded, forcing shutdown");
                    Ok(())
                },
            }
        },
    };

    if let Err(e) = result {
        error!(error = %e, "Server error during shutdown");
        return Err(e.into());
    }
    info!("Server shutdown complete");

    if let Err(e) = provider.stop().await {
        warn!(error = %e, "Provider stop() returned error");
    }

    info!("Provider shutdown complete");
    Ok(())
}
