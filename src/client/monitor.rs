//! Monitor endpoints (`alert_definitions`).

use reqwest::Method;

use super::{validate_id, ApiClient, Checks};
use crate::error::ApiError;
use crate::models::Monitor;

const ALERT_DEFINITIONS: &str = "alert_definitions";
const KIND: &str = "monitor";

impl ApiClient {
    /// Fetch one monitor.
    pub async fn get_monitor(&self, monitor_id: &str) -> Result<Monitor, ApiError> {
        validate_id(KIND, monitor_id)?;
        self.get(&format!("{}/{}", ALERT_DEFINITIONS, monitor_id))
            .await
    }

    /// Fetch every monitor of the organization.
    pub async fn get_all_monitors(&self) -> Result<Vec<Monitor>, ApiError> {
        self.get(ALERT_DEFINITIONS).await
    }

    /// Create a monitor; the server assigns its ID.
    pub async fn create_monitor(&self, monitor: &Monitor) -> Result<Monitor, ApiError> {
        self.fetch(Method::POST, ALERT_DEFINITIONS, Some(monitor), Checks::strict())
            .await
    }

    /// Replace an existing monitor.
    pub async fn update_monitor(
        &self,
        monitor_id: &str,
        monitor: &Monitor,
    ) -> Result<Monitor, ApiError> {
        validate_id(KIND, monitor_id)?;
        self.fetch(
            Method::PUT,
            &format!("{}/{}", ALERT_DEFINITIONS, monitor_id),
            Some(monitor),
            Checks::strict(),
        )
        .await
    }

    /// Delete a monitor.
    pub async fn delete_monitor(&self, monitor_id: &str) -> Result<(), ApiError> {
        validate_id(KIND, monitor_id)?;
        self.delete(&format!("{}/{}", ALERT_DEFINITIONS, monitor_id))
            .await
    }
}
