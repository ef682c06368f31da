//! ChronoVault error types

use thiserror::Error;

/// ChronoVault error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or missing required input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Identifier absent or not owned by the caller. Carries no detail:
    /// callers must not learn whether the record exists.
    #[error("Not found")]
    NotFoundOrForbidden,

    /// Missing or invalid session credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The external generative-text call failed. Never surfaced to users
    /// verbatim; handlers downgrade it to a generic notice.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Durable storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for ChronoVault operations
pub type Result<T> = std::result::Result<T, Error>;
