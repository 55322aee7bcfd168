//! `/api/v1/projects/*` handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use radarsnap_models::{
    AcceptInvitationResponse, CreateProjectRequest, InviteTeamMemberRequest, Paginated, Project,
    ProjectInvitation, ProjectMember, ProjectRole, RegenerateApiKeyResponse,
    UpdateMemberRoleRequest, UpdateProjectRequest, User,
};

use crate::error::ServiceError;
use crate::state::{AppState, user_ref};

fn new_api_key() -> String {
    format!("rs_live_{}", Uuid::new_v4().simple())
}

/// Role of `user` within `project`, if any.
fn role_of(state: &AppState, project: &Project, user: &User) -> Option<ProjectRole> {
    if project.owner == user.id {
        return Some(ProjectRole::Owner);
    }
    state
        .lock_members()
        .get(&project.id)
        .and_then(|members| members.iter().find(|m| m.user.id == user.id))
        .map(|m| m.role)
}

fn project_for(state: &AppState, project_id: &str, user: &User) -> Result<Project, ServiceError> {
    let projects = state.lock_projects();
    let project = projects
        .iter()
        .find(|p| p.id == project_id)
        .cloned()
        .ok_or(ServiceError::NotFound("project"))?;
    drop(projects);
    if role_of(state, &project, user).is_none() {
        return Err(ServiceError::NotFound("project"));
    }
    Ok(project)
}

/// `GET /api/v1/projects/`
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Paginated<Project>>, ServiceError> {
    let user = state.authenticate(&headers)?;
    let projects = state.lock_projects().clone();
    let members = state.lock_members();
    let visible: Vec<Project> = projects
        .into_iter()
        .filter_map(|mut p| {
            let role = if p.owner == user.id {
                Some(ProjectRole::Owner)
            } else {
                members
                    .get(&p.id)
                    .and_then(|ms| ms.iter().find(|m| m.user.id == user.id))
                    .map(|m| m.role)
            }?;
            p.role = Some(role);
            p.member_count = members.get(&p.id).map(|ms| ms.len() as u32);
            Some(p)
        })
        .collect();
    Ok(Json(Paginated::single_page(visible)))
}

/// `GET /api/v1/projects/{project_id}`
pub async fn get(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Result<Json<Project>, ServiceError> {
    let user = state.authenticate(&headers)?;
    Ok(Json(project_for(&state, &project_id, &user)?))
}

/// `POST /api/v1/projects/`
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<Project>, ServiceError> {
    let user = state.authenticate(&headers)?;
    if req.name.trim().is_empty() {
        return Err(ServiceError::Validation("name must not be empty".to_string()));
    }

    let now = Utc::now();
    let project = Project {
        id: Uuid::new_v4().to_string(),
        name: req.name,
        website_url: req.website_url,
        api_key: new_api_key(),
        owner: user.id.clone(),
        is_active: true,
        data_retention_days: 90,
        created_at: now,
        updated_at: now,
        role: Some(ProjectRole::Owner),
        member_count: Some(1),
    };

    let owner_ref = user_ref(&user);
    state.lock_members().insert(
        project.id.clone(),
        vec![ProjectMember {
            id: Uuid::new_v4().to_string(),
            user: owner_ref.clone(),
            role: ProjectRole::Owner,
            invited_by: owner_ref,
            invited_at: now,
            joined_at: Some(now),
        }],
    );
    state.lock_projects().push(project.clone());
    info!(project = %project.id, "project created");
    Ok(Json(project))
}

/// `PUT /api/v1/projects/{project_id}`
pub async fn update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, ServiceError> {
    let user = state.authenticate(&headers)?;
    project_for(&state, &project_id, &user)?;

    let mut projects = state.lock_projects();
    let project = projects
        .iter_mut()
        .find(|p| p.id == project_id)
        .ok_or(ServiceError::NotFound("project"))?;
    if let Some(name) = req.name {
        project.name = name;
    }
    if let Some(url) = req.website_url {
        project.website_url = url;
    }
    if let Some(active) = req.is_active {
        project.is_active = active;
    }
    if let Some(days) = req.data_retention_days {
        project.data_retention_days = days;
    }
    project.updated_at = Utc::now();
    Ok(Json(project.clone()))
}

/// `DELETE /api/v1/projects/{project_id}`
pub async fn delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = state.authenticate(&headers)?;
    project_for(&state, &project_id, &user)?;

    state.lock_projects().retain(|p| p.id != project_id);
    state.lock_members().remove(&project_id);
    state.lock_invitations().remove(&project_id);
    info!(project = %project_id, "project deleted");
    Ok(Json(serde_json::json!({})))
}

/// `POST /api/v1/projects/{project_id}/regenerate-key`
pub async fn regenerate_key(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Result<Json<RegenerateApiKeyResponse>, ServiceError> {
    let user = state.authenticate(&headers)?;
    project_for(&state, &project_id, &user)?;

    let mut projects = state.lock_projects();
    let project = projects
        .iter_mut()
        .find(|p| p.id == project_id)
        .ok_or(ServiceError::NotFound("project"))?;
    project.api_key = new_api_key();
    project.updated_at = Utc::now();
    Ok(Json(RegenerateApiKeyResponse {
        api_key: project.api_key.clone(),
    }))
}

// ---------------------------------------------------------------------------
// Members and invitations
// ---------------------------------------------------------------------------

/// `GET /api/v1/projects/{project_id}/members`
pub async fn members(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<ProjectMember>>, ServiceError> {
    let user = state.authenticate(&headers)?;
    project_for(&state, &project_id, &user)?;
    let members = state
        .lock_members()
        .get(&project_id)
        .cloned()
        .unwrap_or_default();
    Ok(Json(members))
}

/// `GET /api/v1/projects/{project_id}/invitations`
pub async fn invitations(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<ProjectInvitation>>, ServiceError> {
    let user = state.authenticate(&headers)?;
    project_for(&state, &project_id, &user)?;
    let invitations = state
        .lock_invitations()
        .get(&project_id)
        .cloned()
        .unwrap_or_default();
    Ok(Json(invitations))
}

/// `POST /api/v1/projects/{project_id}/invitations`
pub async fn invite(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
    Json(req): Json<InviteTeamMemberRequest>,
) -> Result<Json<ProjectInvitation>, ServiceError> {
    let user = state.authenticate(&headers)?;
    project_for(&state, &project_id, &user)?;
    if req.role == ProjectRole::Owner {
        return Err(ServiceError::Validation(
            "ownership cannot be granted via invitation".to_string(),
        ));
    }

    let now = Utc::now();
    let invitation = ProjectInvitation {
        id: Uuid::new_v4().to_string(),
        email: req.email,
        role: req.role,
        invited_by: user_ref(&user),
        created_at: now,
        expires_at: now + Duration::days(7),
        is_expired: false,
    };
    state
        .lock_invitations()
        .entry(project_id)
        .or_default()
        .push(invitation.clone());
    Ok(Json(invitation))
}

/// `DELETE /api/v1/projects/{project_id}/invitations/{invitation_id}`
pub async fn revoke_invitation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((project_id, invitation_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = state.authenticate(&headers)?;
    project_for(&state, &project_id, &user)?;

    let mut all = state.lock_invitations();
    let pending = all
        .get_mut(&project_id)
        .ok_or(ServiceError::NotFound("invitation"))?;
    let before = pending.len();
    pending.retain(|i| i.id != invitation_id);
    if pending.len() == before {
        return Err(ServiceError::NotFound("invitation"));
    }
    Ok(Json(serde_json::json!({})))
}

/// `POST /api/v1/projects/invitations/{token}/accept`
///
/// The invitation id doubles as the acceptance token.
pub async fn accept_invitation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(token): Path<String>,
) -> Result<Json<AcceptInvitationResponse>, ServiceError> {
    let user = state.authenticate(&headers)?;

    let mut all = state.lock_invitations();
    let (project_id, invitation) = all
        .iter_mut()
        .find_map(|(pid, pending)| {
            let idx = pending.iter().position(|i| i.id == token)?;
            Some((pid.clone(), pending.remove(idx)))
        })
        .ok_or(ServiceError::NotFound("invitation"))?;
    drop(all);

    if invitation.expires_at < Utc::now() {
        return Err(ServiceError::Validation("invitation has expired".to_string()));
    }

    let now = Utc::now();
    let member = ProjectMember {
        id: Uuid::new_v4().to_string(),
        user: user_ref(&user),
        role: invitation.role,
        invited_by: invitation.invited_by,
        invited_at: invitation.created_at,
        joined_at: Some(now),
    };
    state
        .lock_members()
        .entry(project_id.clone())
        .or_default()
        .push(member);

    let project = state
        .lock_projects()
        .iter()
        .find(|p| p.id == project_id)
        .cloned()
        .ok_or(ServiceError::NotFound("project"))?;
    info!(project = %project_id, user = %user.id, "invitation accepted");
    Ok(Json(AcceptInvitationResponse {
        project,
        role: invitation.role,
    }))
}

/// `PUT /api/v1/projects/{project_id}/members/{member_id}`
pub async fn update_member_role(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((project_id, member_id)): Path<(String, String)>,
    Json(req): Json<UpdateMemberRoleRequest>,
) -> Result<Json<ProjectMember>, ServiceError> {
    let user = state.authenticate(&headers)?;
    project_for(&state, &project_id, &user)?;
    if req.role == ProjectRole::Owner {
        return Err(ServiceError::Validation(
            "ownership cannot be granted".to_string(),
        ));
    }

    let mut all = state.lock_members();
    let members = all
        .get_mut(&project_id)
        .ok_or(ServiceError::NotFound("member"))?;
    let member = members
        .iter_mut()
        .find(|m| m.id == member_id)
        .ok_or(ServiceError::NotFound("member"))?;
    member.role = req.role;
    Ok(Json(member.clone()))
}

/// `DELETE /api/v1/projects/{project_id}/members/{member_id}`
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((project_id, member_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = state.authenticate(&headers)?;
    project_for(&state, &project_id, &user)?;

    let mut all = state.lock_members();
    let members = all
        .get_mut(&project_id)
        .ok_or(ServiceError::NotFound("member"))?;
    let before = members.len();
    members.retain(|m| m.id != member_id || m.role == ProjectRole::Owner);
    if members.len() == before {
        return Err(ServiceError::NotFound("member"));
    }
    Ok(Json(serde_json::json!({})))
}
