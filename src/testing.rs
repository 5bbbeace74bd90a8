//! Test harness for driving a [`ProviderService`] without a gRPC server.
//!
//! # Example
//!
//! ```ignore
//! use edgedelta_provider::testing::ProviderTester;
//! use edgedelta_provider::{ApiClient, EdgeDeltaProvider};
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_create_monitor() {
//!     let client = ApiClient::new(&server.uri(), "org", "secret");
//!     let tester = ProviderTester::new(EdgeDeltaProvider::with_client(client));
//!
//!     let state = tester
//!         .lifecycle_create("edgedelta_monitor", json!({"name": "errors", ...}))
//!         .await
//!         .unwrap();
//!     assert_eq!(state["name"], "errors");
//! }
//! ```

use crate::error::ProviderError;
use crate::schema::{Diagnostic, DiagnosticSeverity, ProviderSchema};
use crate::server::ProviderService;
use crate::types::{ImportedResource, PlanResult, ResourceState};
use serde_json::Value;

/// Wraps a provider and exposes the protocol operations as plain async calls.
pub struct ProviderTester<P: ProviderService> {
    provider: P,
}

impl<P: ProviderService> ProviderTester<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    /// Get the list of resource type names.
    pub fn resource_types(&self) -> Vec<String> {
        self.provider.metadata().resources
    }

    /// Validate provider configuration.
    ///
    /// Returns `Err` with the error diagnostics if there are any.
    pub async fn validate_provider_config(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.validate_provider_config(config).await?;
        check_diagnostics(diagnostics)
    }

    /// Configure the provider.
    pub async fn configure(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.configure(config).await?;
        check_diagnostics(diagnostics)
    }

    pub async fn stop(&self) -> Result<(), ProviderError> {
        self.provider.stop().await
    }

    /// Validate a resource configuration.
    pub async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<(), TestError> {
        let diagnostics = self
            .provider
            .validate_resource_config(resource_type, config)
            .await?;
        check_diagnostics(diagnostics)
    }

    /// Plan a resource creation (no prior state).
    pub async fn plan_create(
        &self,
        resource_type: &str,
        proposed_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, None, proposed_state.clone(), proposed_state)
            .await
    }

    /// Plan a resource update.
    pub async fn plan_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        proposed_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(
                resource_type,
                Some(prior_state),
                proposed_state.clone(),
                proposed_state,
            )
            .await
    }

    /// Plan a resource deletion.
    pub async fn plan_delete(
        &self,
        resource_type: &str,
        prior_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, Some(prior_state), Value::Null, Value::Null)
            .await
    }

    pub async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<ResourceState, ProviderError> {
        self.provider.create(resource_type, planned_state).await
    }

    /// Read the current state of a resource. `None` means it is gone.
    pub async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Option<ResourceState>, ProviderError> {
        self.provider.read(resource_type, current_state).await
    }

    pub async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<ResourceState, ProviderError> {
        self.provider
            .update(resource_type, prior_state, planned_state)
            .await
    }

    pub async fn delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        self.provider.delete(resource_type, current_state).await
    }

    /// Import by ID, comma-separated IDs or `*`.
    pub async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        self.provider.import_resource(resource_type, id).await
    }

    /// Upgrade resource state from an older schema version.
    pub async fn upgrade_resource_state(
        &self,
        resource_type: &str,
        version: i64,
        state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider
            .upgrade_resource_state(resource_type, version, state)
            .await
    }

    /// Read a resource that must still exist.
    async fn read_existing(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Value, ProviderError> {
        match self.read(resource_type, current_state).await? {
            Some(read) => Ok(read.state),
            None => Err(ProviderError::NotFound(format!(
                "{} disappeared right after it was written",
                resource_type
            ))),
        }
    }

    /// Run plan → create → read and return the state after read.
    pub async fn lifecycle_create(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let plan_result = self.plan_create(resource_type, config).await?;
        let created = self
            .create(resource_type, plan_result.planned_state)
            .await?;
        self.read_existing(resource_type, created.state).await
    }

    /// Run plan → update → read and return the state after read.
    pub async fn lifecycle_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        proposed_state: Value,
    ) -> Result<Value, ProviderError> {
        let plan_result = self
            .plan_update(resource_type, prior_state.clone(), proposed_state)
            .await?;
        let updated = self
            .update(resource_type, prior_state, plan_result.planned_state)
            .await?;
        self.read_existing(resource_type, updated.state).await
    }

    /// Run plan → delete.
    pub async fn lifecycle_delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        let _ = self
            .plan_delete(resource_type, current_state.clone())
            .await?;
        self.delete(resource_type, current_state).await
    }

    /// Run create → update → delete and return the state after the update.
    pub async fn lifecycle_crud(
        &self,
        resource_type: &str,
        initial_config: Value,
        updated_config: Value,
    ) -> Result<Value, ProviderError> {
        let created_state = self.lifecycle_create(resource_type, initial_config).await?;
        let updated_state = self
            .lifecycle_update(resource_type, created_state, updated_config)
            .await?;
        self.lifecycle_delete(resource_type, updated_state.clone())
            .await?;
        Ok(updated_state)
    }
}

/// Failure of a harness call that reports diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum TestError {
    #[error("{}", describe(.0))]
    Diagnostics(Vec<Diagnostic>),
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

fn describe(diagnostics: &[Diagnostic]) -> String {
    let mut out = format!("Operation failed with {} diagnostic(s):", diagnostics.len());
    for diag in diagnostics {
        out.push_str(&format!("\n  [{:?}] {}", diag.severity, diag.summary));
        if let Some(detail) = &diag.detail {
            out.push_str(&format!(": {}", detail));
        }
        if let Some(attr) = &diag.attribute {
            out.push_str(&format!(" (at {})", attr));
        }
    }
    out
}

/// Keep only error diagnostics; warnings never fail a harness call.
fn check_diagnostics(diagnostics: Vec<Diagnostic>) -> Result<(), TestError> {
    let errors: Vec<_> = diagnostics.into_iter().filter(Diagnostic::is_error).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(TestError::Diagnostics(errors))
    }
}

/// Assert that a plan creates a resource: changes, and every change is an addition.
///
/// # Panics
///
/// Panics if the plan has no changes or any change has a prior value.
pub fn assert_plan_creates(plan: &PlanResult) {
    assert!(
        !plan.changes.is_empty(),
        "Expected plan to have changes for create, but got no changes"
    );
    assert!(
        plan.changes.iter().all(|c| c.before.is_none()),
        "Expected plan to create, but some attributes have prior values: {:?}",
        plan.changes
            .iter()
            .filter(|c| c.before.is_some())
            .map(|c| &c.path)
            .collect::<Vec<_>>()
    );
}

/// Assert that a plan destroys a resource: null planned state.
///
/// # Panics
///
/// Panics if the planned state is not null.
pub fn assert_plan_destroys(plan: &PlanResult) {
    assert!(
        plan.planned_state.is_null(),
        "Expected plan to destroy, but planned state is {}",
        plan.planned_state
    );
}

/// Assert that a plan result indicates no changes.
///
/// # Panics
///
/// Panics if the plan has any changes.
pub fn assert_plan_no_changes(plan: &PlanResult) {
    assert!(
        plan.changes.is_empty(),
        "Expected no changes, but got {} change(s): {:?}",
        plan.changes.len(),
        plan.changes.iter().map(|c| &c.path).collect::<Vec<_>>()
    );
}

pub fn assert_plan_has_changes(plan: &PlanResult) {
    assert!(
        !plan.changes.is_empty(),
        "Expected plan to have changes, but got no changes"
    );
}

/// Assert that a plan has a change for a specific attribute path.
///
/// # Panics
///
/// Panics if the plan does not have a change for the given path.
pub fn assert_plan_changes_attribute(plan: &PlanResult, path: &str) {
    let has_change = plan.changes.iter().any(|c| c.path == path);
    assert!(
        has_change,
        "Expected plan to change attribute '{}', but it was not changed. Changed attributes: {:?}",
        path,
        plan.changes.iter().map(|c| &c.path).collect::<Vec<_>>()
    );
}

pub fn assert_plan_does_not_change_attribute(plan: &PlanResult, path: &str) {
    let has_change = plan.changes.iter().any(|c| c.path == path);
    assert!(
        !has_change,
        "Expected plan to not change attribute '{}', but it was changed",
        path
    );
}

/// Assert that diagnostics contain no errors. Warnings are allowed.
///
/// # Panics
///
/// Panics if there are any error diagnostics.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();

    assert!(
        errors.is_empty(),
        "Expected no errors, but got {} error(s): {:?}",
        errors.len(),
        errors.iter().map(|d| &d.summary).collect::<Vec<_>>()
    );
}

pub fn assert_has_errors(diagnostics: &[Diagnostic]) {
    let has_errors = diagnostics.iter().any(Diagnostic::is_error);
    assert!(has_errors, "Expected at least one error, but got none");
}

/// Assert that diagnostics contain an error with the given summary substring.
///
/// # Panics
///
/// Panics if no error diagnostic contains the given substring.
pub fn assert_error_contains(diagnostics: &[Diagnostic], substring: &str) {
    assert_severity_contains(diagnostics, DiagnosticSeverity::Error, substring);
}

/// Assert that diagnostics contain a warning with the given summary substring.
///
/// # Panics
///
/// Panics if no warning diagnostic contains the given substring.
pub fn assert_warning_contains(diagnostics: &[Diagnostic], substring: &str) {
    assert_severity_contains(diagnostics, DiagnosticSeverity::Warning, substring);
}

fn assert_severity_contains(
    diagnostics: &[Diagnostic],
    severity: DiagnosticSeverity,
    substring: &str,
) {
    let matching = |d: &&Diagnostic| d.severity == severity;
    assert!(
        diagnostics
            .iter()
            .filter(matching)
            .any(|d| d.summary.contains(substring)),
        "Expected a {:?} containing '{}', but none found. Got: {:?}",
        severity,
        substring,
        diagnostics
            .iter()
            .filter(matching)
            .map(|d| &d.summary)
            .collect::<Vec<_>>()
    );
}
