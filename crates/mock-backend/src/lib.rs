//! In-memory Radarsnap API backend.
//!
//! Serves the same HTTP surface the SDK targets: authentication with
//! JWT access tokens and opaque refresh tokens, project and team
//! management over seeded in-memory state, and canned analytics
//! fixtures. Used for local development and as the target of the SDK's
//! end-to-end tests.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fixtures;
pub mod projects;
pub mod state;
pub mod tokens;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};

pub use config::AppConfig;
pub use error::ServiceError;
pub use state::AppState;

/// Build the full API router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/auth/change-password", put(auth::change_password))
        // projects
        .route("/api/v1/projects/", get(projects::list).post(projects::create))
        .route(
            "/api/v1/projects/{project_id}",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route(
            "/api/v1/projects/{project_id}/regenerate-key",
            post(projects::regenerate_key),
        )
        .route(
            "/api/v1/projects/{project_id}/members",
            get(projects::members),
        )
        .route(
            "/api/v1/projects/{project_id}/members/{member_id}",
            put(projects::update_member_role).delete(projects::remove_member),
        )
        .route(
            "/api/v1/projects/{project_id}/invitations",
            get(projects::invitations).post(projects::invite),
        )
        .route(
            "/api/v1/projects/{project_id}/invitations/{invitation_id}",
            delete(projects::revoke_invitation),
        )
        .route(
            "/api/v1/projects/invitations/{token}/accept",
            post(projects::accept_invitation),
        )
        // dashboard
        .route(
            "/api/v1/dashboard/projects/{project_id}/dashboard",
            get(dashboard::overview),
        )
        .route(
            "/api/v1/dashboard/projects/{project_id}/sessions",
            get(dashboard::sessions),
        )
        .route(
            "/api/v1/dashboard/projects/{project_id}/sessions/{session_id}",
            get(dashboard::session_detail),
        )
        .route(
            "/api/v1/dashboard/projects/{project_id}/performance",
            get(dashboard::performance),
        )
        .route(
            "/api/v1/dashboard/projects/{project_id}/errors",
            get(dashboard::errors),
        )
        // analytics
        .route("/api/v1/analytics/stats", get(dashboard::stats))
        .with_state(state)
}
