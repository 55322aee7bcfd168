//! `/api/v1/dashboard/*` and `/api/v1/analytics/*` handlers.
//!
//! All aggregates come from [`crate::fixtures`]; the time-window query
//! parameters are accepted and ignored beyond validation.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;

use radarsnap_models::{
    AnalyticsStats, DashboardOverview, ErrorSummary, Paginated, PerformanceMetrics, Session,
    SessionDetail,
};

use crate::error::ServiceError;
use crate::fixtures;
use crate::state::AppState;

fn ensure_project(state: &AppState, project_id: &str) -> Result<(), ServiceError> {
    let known = state.lock_projects().iter().any(|p| p.id == project_id);
    if known {
        Ok(())
    } else {
        Err(ServiceError::NotFound("project"))
    }
}

/// `GET /api/v1/dashboard/projects/{project_id}/dashboard`
pub async fn overview(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Result<Json<DashboardOverview>, ServiceError> {
    state.authenticate(&headers)?;
    ensure_project(&state, &project_id)?;
    Ok(Json(fixtures::dashboard_overview()))
}

/// `GET /api/v1/dashboard/projects/{project_id}/sessions`
///
/// Query parameters arrive as a flat string map because the segment
/// filters are optional and mixed-type.
pub async fn sessions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Paginated<Session>>, ServiceError> {
    state.authenticate(&headers)?;
    ensure_project(&state, &project_id)?;

    let mut sessions = fixtures::sessions();
    if let Some(device) = params.get("device_type") {
        sessions.retain(|s| &s.device_type == device);
    }
    if let Some(browser) = params.get("browser") {
        sessions.retain(|s| &s.browser == browser);
    }
    if let Some(country) = params.get("country") {
        sessions.retain(|s| &s.country == country);
    }
    Ok(Json(Paginated::single_page(sessions)))
}

/// `GET /api/v1/dashboard/projects/{project_id}/sessions/{session_id}`
pub async fn session_detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((project_id, session_id)): Path<(String, String)>,
) -> Result<Json<SessionDetail>, ServiceError> {
    state.authenticate(&headers)?;
    ensure_project(&state, &project_id)?;
    fixtures::session_detail(&session_id)
        .map(Json)
        .ok_or(ServiceError::NotFound("session"))
}

/// `GET /api/v1/dashboard/projects/{project_id}/performance`
pub async fn performance(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Result<Json<PerformanceMetrics>, ServiceError> {
    state.authenticate(&headers)?;
    ensure_project(&state, &project_id)?;
    Ok(Json(fixtures::performance_metrics()))
}

/// `GET /api/v1/dashboard/projects/{project_id}/errors`
pub async fn errors(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Result<Json<ErrorSummary>, ServiceError> {
    state.authenticate(&headers)?;
    ensure_project(&state, &project_id)?;
    Ok(Json(fixtures::error_summary()))
}

/// `GET /api/v1/analytics/stats`
pub async fn stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<AnalyticsStats>, ServiceError> {
    state.authenticate(&headers)?;
    Ok(Json(fixtures::analytics_stats()))
}
