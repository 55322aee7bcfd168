//! Dashboard and analytics endpoints. Read-only; every aggregate is
//! computed server-side.

use radarsnap_models::{
    AnalyticsStats, DashboardOverview, DashboardQuery, ErrorSummary, Paginated,
    PerformanceMetrics, Session, SessionDetail, SessionsQuery,
};

use crate::client::ApiClient;
use crate::error::ApiError;

/// `/api/v1/dashboard/*` and `/api/v1/analytics/*` endpoint group.
pub struct AnalyticsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AnalyticsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Dashboard overview for a project over the query's time window.
    pub async fn dashboard(
        &self,
        project_id: &str,
        query: &DashboardQuery,
    ) -> Result<DashboardOverview, ApiError> {
        self.client
            .get_with_query(
                &format!("/api/v1/dashboard/projects/{project_id}/dashboard"),
                query.to_pairs(),
            )
            .await
    }

    /// Paginated session list for a project.
    pub async fn sessions(
        &self,
        project_id: &str,
        query: &SessionsQuery,
    ) -> Result<Paginated<Session>, ApiError> {
        self.client
            .get_with_query(
                &format!("/api/v1/dashboard/projects/{project_id}/sessions"),
                query.to_pairs(),
            )
            .await
    }

    /// One session with its full page and event timelines.
    pub async fn session_detail(
        &self,
        project_id: &str,
        session_id: &str,
    ) -> Result<SessionDetail, ApiError> {
        self.client
            .get(&format!(
                "/api/v1/dashboard/projects/{project_id}/sessions/{session_id}"
            ))
            .await
    }

    /// Page performance aggregates for a project.
    pub async fn performance(
        &self,
        project_id: &str,
        query: &DashboardQuery,
    ) -> Result<PerformanceMetrics, ApiError> {
        self.client
            .get_with_query(
                &format!("/api/v1/dashboard/projects/{project_id}/performance"),
                query.to_pairs(),
            )
            .await
    }

    /// Captured-error summary for a project.
    pub async fn errors(
        &self,
        project_id: &str,
        query: &DashboardQuery,
    ) -> Result<ErrorSummary, ApiError> {
        self.client
            .get_with_query(
                &format!("/api/v1/dashboard/projects/{project_id}/errors"),
                query.to_pairs(),
            )
            .await
    }

    /// Global ingestion counters, used to verify a tracking snippet is
    /// delivering events.
    pub async fn stats(&self) -> Result<AnalyticsStats, ApiError> {
        self.client.get("/api/v1/analytics/stats").await
    }
}
