//! HTTP handlers for the auth API
//!
//! - POST `/api/v1/auth/register` — create a user
//! - POST `/api/v1/auth/login`    — issue a bearer token
//! - POST `/api/v1/auth/logout`   — revoke the current token
//! - GET  `/api/v1/auth/me`       — current user profile
//! - PUT  `/api/v1/auth/avatar`   — set the avatar reference

use super::session::{bearer_token, CurrentOwner, SessionManager};
use super::store::UserStore;
use super::types::*;
use crate::api::ApiError;
use crate::error::Error;
use axum::{
    extract::{FromRef, State},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<UserStore>,
    pub sessions: Arc<SessionManager>,
}

impl FromRef<AuthState> for Arc<SessionManager> {
    fn from_ref(state: &AuthState) -> Self {
        state.sessions.clone()
    }
}

/// Create the auth router with all endpoints
pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/auth/avatar", put(set_avatar))
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/v1/auth/register
async fn register(
    State(state): State<AuthState>,
    Json(request): Json<CredentialsRequest>,
) -> impl IntoResponse {
    match state.users.register(&request.handle, &request.password).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(serde_json::to_value(UserProfile::from(&user)).unwrap()),
        ),
        Err(Error::Validation(msg)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::to_value(ApiError::validation(msg)).unwrap()),
        ),
        Err(e) => {
            tracing::error!("Registration failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::to_value(ApiError::internal("Registration failed")).unwrap()),
            )
        }
    }
}

/// POST /api/v1/auth/login
///
/// Unknown handle and wrong password produce the same response shape and
/// message.
async fn login(
    State(state): State<AuthState>,
    Json(request): Json<CredentialsRequest>,
) -> impl IntoResponse {
    match state
        .users
        .verify_login(&request.handle, &request.password)
        .await
    {
        Some(user) => {
            let token = state.sessions.issue(user.id).await;
            tracing::info!(user = %user.handle, "login");
            (
                StatusCode::OK,
                Json(
                    serde_json::to_value(LoginResponse {
                        token,
                        user: UserProfile::from(&user),
                    })
                    .unwrap(),
                ),
            )
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::to_value(ApiError::unauthorized("Invalid passkey or ID")).unwrap()),
        ),
    }
}

/// POST /api/v1/auth/logout
async fn logout(State(state): State<AuthState>, parts: Parts) -> impl IntoResponse {
    if let Some(token) = bearer_token(&parts) {
        state.sessions.revoke(token).await;
    }
    StatusCode::NO_CONTENT
}

/// GET /api/v1/auth/me
async fn me(State(state): State<AuthState>, CurrentOwner(owner): CurrentOwner) -> impl IntoResponse {
    match state.users.get(owner).await {
        Some(user) => (
            StatusCode::OK,
            Json(serde_json::to_value(UserProfile::from(&user)).unwrap()),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::to_value(ApiError::not_found("User not found")).unwrap()),
        ),
    }
}

/// PUT /api/v1/auth/avatar
async fn set_avatar(
    State(state): State<AuthState>,
    CurrentOwner(owner): CurrentOwner,
    Json(request): Json<SetAvatarRequest>,
) -> impl IntoResponse {
    match state.users.set_avatar(owner, &request.avatar_ref).await {
        Ok(user) => (
            StatusCode::OK,
            Json(serde_json::to_value(UserProfile::from(&user)).unwrap()),
        ),
        Err(Error::Validation(msg)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::to_value(ApiError::validation(msg)).unwrap()),
        ),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::to_value(ApiError::not_found("User not found")).unwrap()),
        ),
    }
}
