//! HTTP handler for the insight API
//!
//! - POST `/api/v1/diary/:id/analyze` — one-shot AI reflection on a diary
//!   entry. The response is a transient notice: generated commentary on
//!   success, the generic degraded-mode message on any backend failure.

use super::pipeline::InsightPipeline;
use crate::api::ApiError;
use crate::auth::session::{CurrentOwner, SessionManager};
use crate::error::Error;
use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

/// Shared state for insight handlers
#[derive(Clone)]
pub struct InsightState {
    pub pipeline: Arc<InsightPipeline>,
    pub sessions: Arc<SessionManager>,
}

impl FromRef<InsightState> for Arc<SessionManager> {
    fn from_ref(state: &InsightState) -> Self {
        state.sessions.clone()
    }
}

/// Create the insight router
pub fn insight_router(state: InsightState) -> Router {
    Router::new()
        .route("/api/v1/diary/:id/analyze", post(analyze_entry))
        .with_state(state)
}

/// POST /api/v1/diary/:id/analyze
async fn analyze_entry(
    State(state): State<InsightState>,
    CurrentOwner(owner): CurrentOwner,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.pipeline.analyze(owner, id).await {
        // Both the insight and the degraded-mode notice arrive here as Ok
        Ok(notice) => (StatusCode::OK, Json(serde_json::to_value(notice).unwrap())),
        Err(Error::NotFoundOrForbidden) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::to_value(ApiError::not_found("Entry not found")).unwrap()),
        ),
        Err(e) => {
            tracing::error!("Analyze request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::to_value(ApiError::internal("Analyze request failed")).unwrap()),
            )
        }
    }
}
