//! HTTP handlers for the capsule API
//!
//! - GET    `/api/v1/capsules`         — pending/today/history buckets (main view)
//! - GET    `/api/v1/capsules/history` — unlocked capsules only
//! - POST   `/api/v1/capsules`         — bury a capsule
//! - DELETE `/api/v1/capsules/:id`     — delete (silent no-op when foreign/missing)

use super::classifier::{classify, history_only};
use super::store::CapsuleStore;
use super::types::{BuryRequest, Capsule};
use crate::api::ApiError;
use crate::auth::session::{CurrentOwner, SessionManager};
use crate::clock::SharedClock;
use crate::error::Error;
use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Shared state for capsule handlers
#[derive(Clone)]
pub struct VaultState {
    pub store: Arc<CapsuleStore>,
    pub clock: SharedClock,
    pub sessions: Arc<SessionManager>,
}

impl FromRef<VaultState> for Arc<SessionManager> {
    fn from_ref(state: &VaultState) -> Self {
        state.sessions.clone()
    }
}

/// Create the capsule router with all endpoints
pub fn vault_router(state: VaultState) -> Router {
    Router::new()
        .route("/api/v1/capsules", get(main_view))
        .route("/api/v1/capsules", post(bury))
        .route("/api/v1/capsules/history", get(history_view))
        .route("/api/v1/capsules/:id", delete(delete_capsule))
        .with_state(state)
}

/// History-only response envelope
#[derive(Debug, Serialize)]
struct HistoryResponse {
    history: Vec<Capsule>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/v1/capsules
///
/// The main view: all three buckets at the current instant. A capsule
/// unlocking today that has already passed `now` appears in both today and
/// history; the rendering layer shows both.
async fn main_view(
    State(state): State<VaultState>,
    CurrentOwner(owner): CurrentOwner,
) -> impl IntoResponse {
    let capsules = state.store.list_by_owner(owner).await;
    Json(classify(state.clock.now(), &capsules))
}

/// GET /api/v1/capsules/history
async fn history_view(
    State(state): State<VaultState>,
    CurrentOwner(owner): CurrentOwner,
) -> impl IntoResponse {
    let capsules = state.store.list_by_owner(owner).await;
    Json(HistoryResponse {
        history: history_only(state.clock.now(), &capsules),
    })
}

/// POST /api/v1/capsules
async fn bury(
    State(state): State<VaultState>,
    CurrentOwner(owner): CurrentOwner,
    Json(request): Json<BuryRequest>,
) -> impl IntoResponse {
    match state
        .store
        .create(owner, &request.message, &request.unlock_date)
        .await
    {
        Ok(capsule) => (
            StatusCode::CREATED,
            Json(serde_json::to_value(capsule).unwrap()),
        ),
        Err(Error::Validation(msg)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::to_value(ApiError::validation(msg)).unwrap()),
        ),
        Err(e) => {
            tracing::error!("Failed to bury capsule: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::to_value(ApiError::internal("Failed to bury capsule")).unwrap()),
            )
        }
    }
}

/// DELETE /api/v1/capsules/:id
///
/// Responds 204 whether or not anything was removed. Revealing a
/// distinction would leak whether the ID exists under another owner.
async fn delete_capsule(
    State(state): State<VaultState>,
    CurrentOwner(owner): CurrentOwner,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let removed = state.store.delete(owner, id).await;
    if removed {
        tracing::debug!(capsule = %id, "capsule deleted");
    }
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestVault {
        app: Router,
        store: Arc<CapsuleStore>,
        sessions: Arc<SessionManager>,
        _dir: TempDir,
    }

    async fn make_vault() -> TestVault {
        let dir = TempDir::new().unwrap();
        let clock: SharedClock = Arc::new(FixedClock::at("2024-06-15T12:00:00Z"));
        let store = Arc::new(
            CapsuleStore::new(dir.path().to_path_buf(), clock.clone())
                .await
                .unwrap(),
        );
        let sessions = Arc::new(SessionManager::new(3600, clock.clone()));
        let state = VaultState {
            store: store.clone(),
            clock,
            sessions: sessions.clone(),
        };
        TestVault {
            app: vault_router(state),
            store,
            sessions,
            _dir: dir,
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn authed(request: axum::http::request::Builder, token: &str) -> axum::http::request::Builder {
        request.header("authorization", format!("Bearer {}", token))
    }

    #[tokio::test]
    async fn test_main_view_buckets() {
        let vault = make_vault().await;
        let owner = Uuid::new_v4();
        let token = vault.sessions.issue(owner).await;

        // One past, one unlocking today at 00:00, one future
        vault.store.create(owner, "past", "2024-06-10").await.unwrap();
        vault.store.create(owner, "today", "2024-06-15").await.unwrap();
        vault.store.create(owner, "future", "2024-06-20").await.unwrap();

        let resp = vault
            .app
            .oneshot(
                authed(Request::builder().uri("/api/v1/capsules"), &token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;

        let pending = json["pending"].as_array().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0]["message"], "future");

        let today = json["today"].as_array().unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0]["message"], "today");

        // History descending: today's capsule (already passed noon) first
        let history = json["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["message"], "today");
        assert_eq!(history[1]["message"], "past");
    }

    #[tokio::test]
    async fn test_main_view_is_owner_scoped() {
        let vault = make_vault().await;
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let bob_token = vault.sessions.issue(bob).await;

        vault.store.create(alice, "secret", "2024-06-10").await.unwrap();

        let resp = vault
            .app
            .oneshot(
                authed(Request::builder().uri("/api/v1/capsules"), &bob_token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = body_json(resp).await;
        assert!(json["pending"].as_array().unwrap().is_empty());
        assert!(json["today"].as_array().unwrap().is_empty());
        assert!(json["history"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_view_has_no_today_overlay() {
        let vault = make_vault().await;
        let owner = Uuid::new_v4();
        let token = vault.sessions.issue(owner).await;

        vault.store.create(owner, "past", "2024-06-10").await.unwrap();
        vault.store.create(owner, "future", "2024-06-20").await.unwrap();

        let resp = vault
            .app
            .oneshot(
                authed(Request::builder().uri("/api/v1/capsules/history"), &token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let history = json["history"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["message"], "past");
        assert!(json.get("pending").is_none());
        assert!(json.get("today").is_none());
    }

    #[tokio::test]
    async fn test_bury_creates_capsule() {
        let vault = make_vault().await;
        let owner = Uuid::new_v4();
        let token = vault.sessions.issue(owner).await;

        let resp = vault
            .app
            .oneshot(
                authed(
                    Request::builder()
                        .method("POST")
                        .uri("/api/v1/capsules")
                        .header("content-type", "application/json"),
                    &token,
                )
                .body(Body::from(
                    serde_json::json!({
                        "message": "see you in 2030",
                        "unlockDate": "2030-01-01"
                    })
                    .to_string(),
                ))
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "see you in 2030");
        assert_eq!(json["unlockInstant"], "2030-01-01T00:00:00Z");
        assert_eq!(vault.store.count().await, 1);
    }

    #[tokio::test]
    async fn test_bury_invalid_date_fails_soft() {
        let vault = make_vault().await;
        let owner = Uuid::new_v4();
        let token = vault.sessions.issue(owner).await;

        let resp = vault
            .app
            .oneshot(
                authed(
                    Request::builder()
                        .method("POST")
                        .uri("/api/v1/capsules")
                        .header("content-type", "application/json"),
                    &token,
                )
                .body(Body::from(
                    serde_json::json!({
                        "message": "oops",
                        "unlockDate": "not-a-date"
                    })
                    .to_string(),
                ))
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "VALIDATION");
        // Store unchanged
        assert_eq!(vault.store.count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_own_capsule() {
        let vault = make_vault().await;
        let owner = Uuid::new_v4();
        let token = vault.sessions.issue(owner).await;
        let capsule = vault.store.create(owner, "bye", "2030-01-01").await.unwrap();

        let resp = vault
            .app
            .oneshot(
                authed(
                    Request::builder()
                        .method("DELETE")
                        .uri(format!("/api/v1/capsules/{}", capsule.id)),
                    &token,
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(vault.store.count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_foreign_capsule_indistinguishable() {
        let vault = make_vault().await;
        let alice = Uuid::new_v4();
        let mallory = Uuid::new_v4();
        let mallory_token = vault.sessions.issue(mallory).await;
        let capsule = vault.store.create(alice, "mine", "2030-01-01").await.unwrap();

        // Foreign delete and missing delete return the same response
        let foreign = vault
            .app
            .clone()
            .oneshot(
                authed(
                    Request::builder()
                        .method("DELETE")
                        .uri(format!("/api/v1/capsules/{}", capsule.id)),
                    &mallory_token,
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        let missing = vault
            .app
            .oneshot(
                authed(
                    Request::builder()
                        .method("DELETE")
                        .uri(format!("/api/v1/capsules/{}", Uuid::new_v4())),
                    &mallory_token,
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(foreign.status(), StatusCode::NO_CONTENT);
        assert_eq!(missing.status(), StatusCode::NO_CONTENT);
        // Alice's capsule untouched
        assert_eq!(vault.store.count().await, 1);
    }

    #[tokio::test]
    async fn test_unauthenticated_requests_rejected() {
        let vault = make_vault().await;
        let resp = vault
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/capsules")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
