//! HTTP handlers for the diary API
//!
//! - GET  `/api/v1/diary` — entries, newest first
//! - POST `/api/v1/diary` — append an entry; empty content is silently
//!   ignored and the request succeeds with the list unchanged

use super::store::DiaryStore;
use super::types::{DiaryResponse, PostEntryRequest};
use crate::auth::session::{CurrentOwner, SessionManager};
use crate::error::Error;
use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Shared state for diary handlers
#[derive(Clone)]
pub struct DiaryState {
    pub store: Arc<DiaryStore>,
    pub sessions: Arc<SessionManager>,
}

impl FromRef<DiaryState> for Arc<SessionManager> {
    fn from_ref(state: &DiaryState) -> Self {
        state.sessions.clone()
    }
}

/// Create the diary router with all endpoints
pub fn diary_router(state: DiaryState) -> Router {
    Router::new()
        .route("/api/v1/diary", get(list_entries))
        .route("/api/v1/diary", post(post_entry))
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/v1/diary
async fn list_entries(
    State(state): State<DiaryState>,
    CurrentOwner(owner): CurrentOwner,
) -> impl IntoResponse {
    Json(DiaryResponse {
        entries: state.store.list_by_owner(owner).await,
    })
}

/// POST /api/v1/diary
///
/// Empty content creates nothing and surfaces no error: the response is
/// the (unchanged) entry list, matching the product's post-and-refresh
/// behavior.
async fn post_entry(
    State(state): State<DiaryState>,
    CurrentOwner(owner): CurrentOwner,
    Json(request): Json<PostEntryRequest>,
) -> impl IntoResponse {
    match state.store.append(owner, &request.content).await {
        Ok(_) | Err(Error::Validation(_)) => {}
        Err(e) => {
            tracing::error!("Failed to append diary entry: {}", e);
        }
    }

    (
        StatusCode::OK,
        Json(DiaryResponse {
            entries: state.store.list_by_owner(owner).await,
        }),
    )
}
