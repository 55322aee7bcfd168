//! Project and team management endpoints.

use radarsnap_models::{
    AcceptInvitationResponse, CreateProjectRequest, InviteTeamMemberRequest, Paginated, Project,
    ProjectInvitation, ProjectMember, ProjectRole, RegenerateApiKeyResponse,
    UpdateMemberRoleRequest, UpdateProjectRequest,
};

use crate::client::ApiClient;
use crate::error::ApiError;

/// `/api/v1/projects/*` endpoint group.
pub struct ProjectsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProjectsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    /// List the projects the user belongs to.
    pub async fn list(&self) -> Result<Paginated<Project>, ApiError> {
        self.client.get("/api/v1/projects/").await
    }

    /// Fetch one project.
    pub async fn get(&self, project_id: &str) -> Result<Project, ApiError> {
        self.client
            .get(&format!("/api/v1/projects/{project_id}"))
            .await
    }

    /// Create a project. The creator becomes its owner.
    pub async fn create(&self, request: &CreateProjectRequest) -> Result<Project, ApiError> {
        self.client.post("/api/v1/projects/", request).await
    }

    /// Update project settings. Absent fields are left unchanged.
    pub async fn update(
        &self,
        project_id: &str,
        request: &UpdateProjectRequest,
    ) -> Result<Project, ApiError> {
        self.client
            .put(&format!("/api/v1/projects/{project_id}"), request)
            .await
    }

    /// Delete a project and all of its analytics data.
    pub async fn delete(&self, project_id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/api/v1/projects/{project_id}"))
            .await
    }

    /// Replace the project's ingestion API key. The previous key stops
    /// working immediately.
    pub async fn regenerate_api_key(
        &self,
        project_id: &str,
    ) -> Result<RegenerateApiKeyResponse, ApiError> {
        self.client
            .post_empty(&format!("/api/v1/projects/{project_id}/regenerate-key"))
            .await
    }

    // ------------------------------------------------------------------
    // Members and invitations
    // ------------------------------------------------------------------

    /// List project members.
    pub async fn members(&self, project_id: &str) -> Result<Vec<ProjectMember>, ApiError> {
        self.client
            .get(&format!("/api/v1/projects/{project_id}/members"))
            .await
    }

    /// List pending invitations.
    pub async fn invitations(&self, project_id: &str) -> Result<Vec<ProjectInvitation>, ApiError> {
        self.client
            .get(&format!("/api/v1/projects/{project_id}/invitations"))
            .await
    }

    /// Invite someone to the project by email.
    pub async fn invite(
        &self,
        project_id: &str,
        request: &InviteTeamMemberRequest,
    ) -> Result<ProjectInvitation, ApiError> {
        self.client
            .post(&format!("/api/v1/projects/{project_id}/invitations"), request)
            .await
    }

    /// Revoke a pending invitation.
    pub async fn revoke_invitation(
        &self,
        project_id: &str,
        invitation_id: &str,
    ) -> Result<(), ApiError> {
        self.client
            .delete(&format!(
                "/api/v1/projects/{project_id}/invitations/{invitation_id}"
            ))
            .await
    }

    /// Accept an invitation by its token, joining the project.
    pub async fn accept_invitation(
        &self,
        token: &str,
    ) -> Result<AcceptInvitationResponse, ApiError> {
        self.client
            .post_empty(&format!("/api/v1/projects/invitations/{token}/accept"))
            .await
    }

    /// Change a member's role.
    pub async fn update_member_role(
        &self,
        project_id: &str,
        member_id: &str,
        role: ProjectRole,
    ) -> Result<ProjectMember, ApiError> {
        let body = UpdateMemberRoleRequest { role };
        self.client
            .put(
                &format!("/api/v1/projects/{project_id}/members/{member_id}"),
                &body,
            )
            .await
    }

    /// Remove a member from the project.
    pub async fn remove_member(&self, project_id: &str, member_id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!(
                "/api/v1/projects/{project_id}/members/{member_id}"
            ))
            .await
    }

    // ------------------------------------------------------------------
    // Current project selection
    // ------------------------------------------------------------------

    /// Remember `project_id` as the working project. The selection
    /// persists in the session store across restarts and logouts.
    pub fn select(&self, project_id: &str) -> Result<(), ApiError> {
        Ok(self.client.store().set_current_project_id(project_id)?)
    }

    /// The currently selected project id, if any.
    pub fn selected(&self) -> Result<Option<String>, ApiError> {
        Ok(self.client.store().current_project_id()?)
    }
}
