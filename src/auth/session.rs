//! Opaque bearer sessions and the current-owner extractor
//!
//! Sessions are random 256-bit tokens held in memory with a TTL measured
//! against the injected clock. Sessions are not persisted; a restart logs
//! everyone out.

use crate::api::ApiError;
use crate::clock::SharedClock;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts, StatusCode};
use axum::Json;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

const TOKEN_LEN: usize = 32;

#[derive(Debug, Clone)]
struct Session {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// In-memory session registry.
pub struct SessionManager {
    ttl: Duration,
    clock: SharedClock,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionManager {
    /// Create a session manager with the given TTL in seconds.
    pub fn new(ttl_secs: u64, clock: SharedClock) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs as i64),
            clock,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Issue a fresh token for `user_id`.
    pub async fn issue(&self, user_id: Uuid) -> String {
        let mut raw = [0u8; TOKEN_LEN];
        rand::thread_rng().fill_bytes(&mut raw);
        let token = URL_SAFE_NO_PAD.encode(raw);

        let session = Session {
            user_id,
            expires_at: self.clock.now() + self.ttl,
        };
        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    /// Resolve a token to its owner, dropping it when expired.
    pub async fn resolve(&self, token: &str) -> Option<Uuid> {
        let now = self.clock.now();

        let expired = {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(session) if session.expires_at > now => return Some(session.user_id),
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            self.sessions.write().await.remove(token);
        }
        None
    }

    /// Revoke a token. Unknown tokens are a no-op.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Number of live (possibly expired but not yet pruned) sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Extract the bearer token from an Authorization header value.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// The authenticated owner of the current request.
///
/// Resolved from the bearer token before any handler runs; handlers below
/// this point trust the identity without re-verifying credentials.
#[derive(Debug, Clone, Copy)]
pub struct CurrentOwner(pub Uuid);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentOwner
where
    S: Send + Sync,
    Arc<SessionManager>: FromRef<S>,
{
    type Rejection = (StatusCode, Json<ApiError>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = Arc::<SessionManager>::from_ref(state);

        let token = bearer_token(parts).ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiError::unauthorized("Missing bearer token")),
            )
        })?;

        match sessions.resolve(token).await {
            Some(user_id) => Ok(CurrentOwner(user_id)),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiError::unauthorized("Session expired or invalid")),
            )),
        }
    }
}
