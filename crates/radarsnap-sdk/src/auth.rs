//! Authentication and account endpoints.

use radarsnap_models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, LogoutRequest, MessageResponse,
    RegisterRequest, User,
};

use crate::client::ApiClient;
use crate::error::ApiError;

/// `/api/v1/auth/*` endpoint group.
///
/// `login` and `register` are public calls: they carry no bearer token
/// and never enter the refresh pipeline. On success both persist the
/// returned session so subsequent authenticated calls work immediately.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Authenticate with email and password, persisting the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.client.public_post("/api/v1/auth/login", &body).await?;
        self.client.store().set_session(
            &response.access_token,
            &response.refresh_token,
            &response.user,
        )?;
        tracing::info!(email, "logged in");
        Ok(response)
    }

    /// Create an account, persisting the returned session.
    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self
            .client
            .public_post("/api/v1/auth/register", request)
            .await?;
        self.client.store().set_session(
            &response.access_token,
            &response.refresh_token,
            &response.user,
        )?;
        Ok(response)
    }

    /// Log out: revoke the refresh token server-side when possible, then
    /// wipe the local session unconditionally.
    ///
    /// Server-side revocation is best effort. A failed revocation call is
    /// logged and swallowed so the local session is always cleared.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Some(refresh_token) = self.client.store().refresh_token()? {
            let body = LogoutRequest { refresh_token };
            let result: Result<MessageResponse, ApiError> =
                self.client.post("/api/v1/auth/logout", &body).await;
            if let Err(e) = result {
                tracing::debug!(error = %e, "server-side logout failed, clearing locally");
            }
        }
        self.client.store().clear_session()?;
        Ok(())
    }

    /// Fetch the authenticated user's profile and refresh the cached copy.
    pub async fn me(&self) -> Result<User, ApiError> {
        let user: User = self.client.get("/api/v1/auth/me").await?;
        self.client.store().set_user(&user)?;
        Ok(user)
    }

    /// Change the account password.
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let body = ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.client.put("/api/v1/auth/change-password", &body).await
    }
}
