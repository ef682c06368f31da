//! Unified API router for ChronoVault
//!
//! Merges all module routers into a single axum `Router` with CORS,
//! consistent error handling, and per-module state.
//!
//! ## Endpoint Map
//!
//! | Prefix                        | Module  | Description                         |
//! |-------------------------------|---------|-------------------------------------|
//! | `/health`                     | api     | Load balancer health probe          |
//! | `/api/v1/auth/*`              | auth    | Register, login, logout, profile    |
//! | `/api/v1/capsules*`           | vault   | Buckets, history, bury, delete      |
//! | `/api/v1/diary`               | diary   | Entry list and append               |
//! | `/api/v1/diary/:id/analyze`   | insight | One-shot AI reflection              |

use crate::auth::{auth_router, AuthState};
use crate::diary::{diary_router, DiaryState};
use crate::insight::{insight_router, InsightState};
use crate::vault::{vault_router, VaultState};
use axum::{
    http::{header, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

/// Build the complete ChronoVault HTTP application
///
/// Merges all module routers, adds CORS middleware, and returns a single
/// `Router` ready to be served by `axum::serve`.
pub fn build_app(
    auth_state: AuthState,
    vault_state: VaultState,
    diary_state: DiaryState,
    insight_state: InsightState,
    cors_origins: &[String],
) -> Router {
    let cors = build_cors(cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_router(auth_state))
        .merge(vault_router(vault_state))
        .merge(diary_router(diary_state))
        .merge(insight_router(insight_state))
        .layer(cors)
}

// =============================================================================
// Root handlers
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Error envelope
// =============================================================================

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

/// API error detail
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn with_code(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code("NOT_FOUND", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_code("VALIDATION", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_code("UNAUTHORIZED", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_code("INTERNAL_ERROR", message)
    }
}

// =============================================================================
// CORS
// =============================================================================

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(parsed)
    }
}
