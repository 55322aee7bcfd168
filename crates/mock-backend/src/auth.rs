//! `/api/v1/auth/*` handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use radarsnap_models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, LogoutRequest, MessageResponse,
    RefreshTokenRequest, RefreshTokenResponse, RegisterRequest, User,
};

use crate::error::ServiceError;
use crate::state::{AppState, UserAccount};
use crate::tokens;

fn issue_session(state: &AppState, user: &User) -> Result<LoginResponse, ServiceError> {
    let access_token =
        tokens::mint_access_token(&state.config.jwt_secret, user, state.config.access_ttl_secs)?;
    let refresh_token = tokens::mint_refresh_token();
    state
        .lock_refresh_tokens()
        .insert(refresh_token.clone(), user.id.clone());
    Ok(LoginResponse {
        access_token,
        refresh_token,
        user: user.clone(),
    })
}

/// `POST /api/v1/auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServiceError> {
    let account = state
        .account_by_email(&req.email)
        .ok_or(ServiceError::InvalidCredentials)?;
    if account.password != req.password {
        return Err(ServiceError::InvalidCredentials);
    }
    info!(email = %req.email, "login");
    Ok(Json(issue_session(&state, &account.user)?))
}

/// `POST /api/v1/auth/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<LoginResponse>, ServiceError> {
    if !req.email.contains('@') {
        return Err(ServiceError::Validation("email is not valid".to_string()));
    }
    if req.password.len() < 8 {
        return Err(ServiceError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }
    if state.account_by_email(&req.email).is_some() {
        return Err(ServiceError::EmailTaken);
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: req.email,
        first_name: req.first_name,
        last_name: req.last_name,
        email_verified: false,
        created_at: now,
        updated_at: now,
    };
    state.lock_users().push(UserAccount {
        user: user.clone(),
        password: req.password,
    });
    info!(email = %user.email, "account created");
    Ok(Json(issue_session(&state, &user)?))
}

/// `POST /api/v1/auth/refresh`
///
/// The one endpoint the SDK's refresh coordinator talks to. Exchanges a
/// live refresh token for a new access token, rotating the refresh token
/// when configured to.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<Json<RefreshTokenResponse>, ServiceError> {
    let mut live = state.lock_refresh_tokens();
    let user_id = live
        .get(&req.refresh_token)
        .cloned()
        .ok_or(ServiceError::InvalidToken)?;
    let account = state
        .account_by_id(&user_id)
        .ok_or(ServiceError::InvalidToken)?;

    let access_token = tokens::mint_access_token(
        &state.config.jwt_secret,
        &account.user,
        state.config.access_ttl_secs,
    )?;

    let rotated = if state.config.rotate_refresh_tokens {
        live.remove(&req.refresh_token);
        let next = tokens::mint_refresh_token();
        live.insert(next.clone(), user_id);
        Some(next)
    } else {
        None
    };

    info!(user = %account.user.id, rotated = rotated.is_some(), "refresh token exchanged");
    Ok(Json(RefreshTokenResponse {
        access_token,
        refresh_token: rotated,
    }))
}

/// `POST /api/v1/auth/logout`
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<MessageResponse>, ServiceError> {
    let user = state.authenticate(&headers)?;
    state.lock_refresh_tokens().remove(&req.refresh_token);
    info!(user = %user.id, "logged out");
    Ok(Json(MessageResponse {
        message: "logged out".to_string(),
    }))
}

/// `GET /api/v1/auth/me`
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<User>, ServiceError> {
    Ok(Json(state.authenticate(&headers)?))
}

/// `PUT /api/v1/auth/change-password`
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ServiceError> {
    let user = state.authenticate(&headers)?;
    if req.new_password.len() < 8 {
        return Err(ServiceError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }
    let mut accounts = state.lock_users();
    let account = accounts
        .iter_mut()
        .find(|a| a.user.id == user.id)
        .ok_or(ServiceError::InvalidToken)?;
    if account.password != req.old_password {
        return Err(ServiceError::Validation(
            "current password is incorrect".to_string(),
        ));
    }
    account.password = req.new_password;
    account.user.updated_at = Utc::now();
    Ok(Json(MessageResponse {
        message: "password changed".to_string(),
    }))
}
