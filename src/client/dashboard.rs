//! Dashboard endpoints.

use reqwest::Method;

use super::{validate_id, ApiClient, Checks};
use crate::error::ApiError;
use crate::models::Dashboard;

const DASHBOARDS: &str = "dashboards";
const KIND: &str = "dashboard";

impl ApiClient {
    /// Fetch one dashboard.
    pub async fn get_dashboard(&self, dashboard_id: &str) -> Result<Dashboard, ApiError> {
        validate_id(KIND, dashboard_id)?;
        self.get(&format!("{}/{}", DASHBOARDS, dashboard_id)).await
    }

    /// Fetch every dashboard of the organization.
    pub async fn get_all_dashboards(&self) -> Result<Vec<Dashboard>, ApiError> {
        self.get(DASHBOARDS).await
    }

    /// Create a dashboard; the server assigns its ID.
    pub async fn create_dashboard(&self, dashboard: &Dashboard) -> Result<Dashboard, ApiError> {
        self.fetch(Method::POST, DASHBOARDS, Some(dashboard), Checks::strict())
            .await
    }

    /// Replace the name, description, tags and definition of a dashboard.
    pub async fn update_dashboard(
        &self,
        dashboard_id: &str,
        dashboard: &Dashboard,
    ) -> Result<Dashboard, ApiError> {
        validate_id(KIND, dashboard_id)?;
        self.fetch(
            Method::PUT,
            &format!("{}/{}", DASHBOARDS, dashboard_id),
            Some(dashboard),
            Checks::strict(),
        )
        .await
    }

    /// Delete a dashboard.
    pub async fn delete_dashboard(&self, dashboard_id: &str) -> Result<(), ApiError> {
        validate_id(KIND, dashboard_id)?;
        self.delete(&format!("{}/{}", DASHBOARDS, dashboard_id)).await
    }
}
