//! Project and team-membership DTOs.
//!
//! A *project* is a web property being tracked (one per instrumented
//! site). Each project carries its own ingestion API key and a set of
//! members with per-project roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Role of a user within a project.
///
/// `Owner` is assigned at creation and cannot be granted via invitation.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    /// Creator of the project; full control including deletion.
    Owner,
    /// Full management rights except ownership transfer.
    Admin,
    /// Read/write access to analytics configuration.
    Developer,
    /// Read-only dashboard access.
    Viewer,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// A tracked web property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Stable project identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL of the instrumented site.
    pub website_url: String,
    /// Ingestion API key embedded in the tracking snippet.
    pub api_key: String,
    /// User id of the project owner.
    pub owner: String,
    /// Whether event ingestion is currently enabled.
    pub is_active: bool,
    /// How long raw events are retained.
    pub data_retention_days: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Role of the requesting user, when listing projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ProjectRole>,
    /// Number of members, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<u32>,
}

/// Body of `POST /api/v1/projects/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    /// Display name.
    pub name: String,
    /// URL of the site to instrument.
    pub website_url: String,
}

/// Body of `PUT /api/v1/projects/{id}`. All fields optional; absent
/// fields are left unchanged by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New site URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    /// Enable or disable ingestion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// New retention window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_retention_days: Option<u32>,
}

/// Response of `POST /api/v1/projects/{id}/regenerate-key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegenerateApiKeyResponse {
    /// The replacement ingestion key. The previous key stops working
    /// immediately.
    pub api_key: String,
}

// ---------------------------------------------------------------------------
// Members and invitations
// ---------------------------------------------------------------------------

/// Compact user reference embedded in member/invitation records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// User id.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// A user's membership in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMember {
    /// Membership record id.
    pub id: String,
    /// The member.
    pub user: UserRef,
    /// Role within the project.
    pub role: ProjectRole,
    /// Who issued the invitation.
    pub invited_by: UserRef,
    /// When the invitation was issued.
    pub invited_at: DateTime<Utc>,
    /// When the invitation was accepted; `None` while pending.
    pub joined_at: Option<DateTime<Utc>>,
}

/// A pending invitation to join a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInvitation {
    /// Invitation id.
    pub id: String,
    /// Invitee email address.
    pub email: String,
    /// Role that will be granted on acceptance.
    pub role: ProjectRole,
    /// Who issued the invitation.
    pub invited_by: UserRef,
    /// When the invitation was issued.
    pub created_at: DateTime<Utc>,
    /// When the invitation lapses.
    pub expires_at: DateTime<Utc>,
    /// Whether the invitation has already lapsed.
    pub is_expired: bool,
}

/// Body of `POST /api/v1/projects/{id}/invitations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteTeamMemberRequest {
    /// Invitee email address.
    pub email: String,
    /// Role to grant (never `Owner`).
    pub role: ProjectRole,
}

/// Body of `PUT /api/v1/projects/{id}/members/{member_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMemberRoleRequest {
    /// Replacement role (never `Owner`).
    pub role: ProjectRole,
}

/// Response of `POST /api/v1/projects/invitations/{token}/accept`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptInvitationResponse {
    /// The project that was joined.
    pub project: Project,
    /// Role granted to the accepting user.
    pub role: ProjectRole,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_string_forms() {
        assert_eq!(ProjectRole::Owner.to_string(), "owner");
        assert_eq!(ProjectRole::from_str("viewer").unwrap(), ProjectRole::Viewer);
        assert!(ProjectRole::from_str("superuser").is_err());
    }

    #[test]
    fn role_serde_lowercase() {
        let json = serde_json::to_string(&ProjectRole::Developer).unwrap();
        assert_eq!(json, "\"developer\"");
        let back: ProjectRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(back, ProjectRole::Admin);
    }

    #[test]
    fn all_roles_enumerable() {
        use strum::IntoEnumIterator;
        assert_eq!(ProjectRole::iter().count(), 4);
    }

    #[test]
    fn update_request_skips_absent_fields() {
        let req = UpdateProjectRequest {
            name: Some("Checkout".into()),
            ..UpdateProjectRequest::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"name":"Checkout"}"#);
    }

    #[test]
    fn project_optional_fields_default() {
        let json = r#"{
            "id": "p-1",
            "name": "Shop",
            "website_url": "https://shop.example.com",
            "api_key": "rs_live_abc",
            "owner": "u-1",
            "is_active": true,
            "data_retention_days": 90,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(project.role.is_none());
        assert!(project.member_count.is_none());
    }
}
