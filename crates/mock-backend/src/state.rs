//! Shared application state.
//!
//! Everything lives in memory behind mutexes. The state is seeded with a
//! demo account and project so the CLI and the SDK examples work against
//! a freshly started backend without any setup.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::http::{HeaderMap, header};
use chrono::Utc;
use uuid::Uuid;

use radarsnap_models::{Project, ProjectInvitation, ProjectMember, ProjectRole, User, UserRef};

use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::tokens;

/// A registered account. Passwords are kept in plaintext; this backend
/// only ever holds fixture data.
#[derive(Debug, Clone)]
pub struct UserAccount {
    /// Public profile.
    pub user: User,
    /// Plaintext password.
    pub password: String,
}

/// State shared across all Axum handlers.
pub struct AppState {
    /// Global configuration.
    pub config: AppConfig,
    /// Registered accounts.
    pub users: Mutex<Vec<UserAccount>>,
    /// Live refresh tokens, token → user id.
    pub refresh_tokens: Mutex<HashMap<String, String>>,
    /// Projects.
    pub projects: Mutex<Vec<Project>>,
    /// Memberships, project id → members.
    pub members: Mutex<HashMap<String, Vec<ProjectMember>>>,
    /// Pending invitations, project id → invitations.
    pub invitations: Mutex<HashMap<String, Vec<ProjectInvitation>>>,
}

/// Email of the seeded demo account.
pub const DEMO_EMAIL: &str = "demo@radarsnap.dev";
/// Password of the seeded demo account.
pub const DEMO_PASSWORD: &str = "radarsnap";
/// Id of the seeded demo project.
pub const DEMO_PROJECT_ID: &str = "p-demo";

impl AppState {
    /// Fresh state holding the demo account and project.
    pub fn seeded(config: AppConfig) -> Arc<Self> {
        let now = Utc::now();
        let demo_user = User {
            id: "u-demo".to_string(),
            email: DEMO_EMAIL.to_string(),
            first_name: "Demo".to_string(),
            last_name: "User".to_string(),
            email_verified: true,
            created_at: now,
            updated_at: now,
        };
        let demo_project = Project {
            id: DEMO_PROJECT_ID.to_string(),
            name: "Demo Shop".to_string(),
            website_url: "https://shop.example.com".to_string(),
            api_key: "rs_live_demo0000000000000000".to_string(),
            owner: demo_user.id.clone(),
            is_active: true,
            data_retention_days: 90,
            created_at: now,
            updated_at: now,
            role: None,
            member_count: None,
        };
        let owner_ref = user_ref(&demo_user);
        let owner_member = ProjectMember {
            id: Uuid::new_v4().to_string(),
            user: owner_ref.clone(),
            role: ProjectRole::Owner,
            invited_by: owner_ref,
            invited_at: now,
            joined_at: Some(now),
        };

        let mut members = HashMap::new();
        members.insert(DEMO_PROJECT_ID.to_string(), vec![owner_member]);

        Arc::new(Self {
            config,
            users: Mutex::new(vec![UserAccount {
                user: demo_user,
                password: DEMO_PASSWORD.to_string(),
            }]),
            refresh_tokens: Mutex::new(HashMap::new()),
            projects: Mutex::new(vec![demo_project]),
            members: Mutex::new(members),
            invitations: Mutex::new(HashMap::new()),
        })
    }

    /// Look up an account by email.
    pub fn account_by_email(&self, email: &str) -> Option<UserAccount> {
        self.lock_users()
            .iter()
            .find(|a| a.user.email == email)
            .cloned()
    }

    /// Look up an account by user id.
    pub fn account_by_id(&self, id: &str) -> Option<UserAccount> {
        self.lock_users().iter().find(|a| a.user.id == id).cloned()
    }

    /// Resolve the bearer token in `headers` to its user.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<User, ServiceError> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ServiceError::InvalidToken)?;
        let claims = tokens::verify_access_token(&self.config.jwt_secret, token)?;
        self.account_by_id(&claims.sub)
            .map(|a| a.user)
            .ok_or(ServiceError::InvalidToken)
    }

    // Lock accessors recover from poisoning: a panicking handler must not
    // take the whole dev server down with it.

    pub(crate) fn lock_users(&self) -> MutexGuard<'_, Vec<UserAccount>> {
        self.users.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub(crate) fn lock_refresh_tokens(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.refresh_tokens
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub(crate) fn lock_projects(&self) -> MutexGuard<'_, Vec<Project>> {
        self.projects.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub(crate) fn lock_members(&self) -> MutexGuard<'_, HashMap<String, Vec<ProjectMember>>> {
        self.members.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub(crate) fn lock_invitations(
        &self,
    ) -> MutexGuard<'_, HashMap<String, Vec<ProjectInvitation>>> {
        self.invitations
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Compact reference to a user, as embedded in membership records.
pub fn user_ref(user: &User) -> UserRef {
    UserRef {
        id: user.id.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_state_knows_the_demo_account() {
        let state = AppState::seeded(AppConfig::default());
        assert!(state.account_by_email(DEMO_EMAIL).is_some());
        assert!(state.account_by_id("u-demo").is_some());
    }

    #[test]
    fn locks_recover_after_a_handler_panic() {
        let state = AppState::seeded(AppConfig::default());

        let poisoner = Arc::clone(&state);
        let _ = std::thread::spawn(move || {
            let _users = poisoner.users.lock().unwrap();
            let _tokens = poisoner.refresh_tokens.lock().unwrap();
            panic!("handler died while holding state locks");
        })
        .join();

        assert!(state.users.lock().is_err());
        state
            .lock_refresh_tokens()
            .insert("r-1".to_string(), "u-demo".to_string());
        assert_eq!(state.lock_users().len(), 1);
        assert_eq!(
            state.lock_refresh_tokens().get("r-1").map(String::as_str),
            Some("u-demo")
        );
    }
}
