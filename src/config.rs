//! ChronoVault configuration management
//!
//! The whole configuration is one immutable [`VaultConfig`] constructed at
//! process start (from a TOML file or defaults) and passed by reference into
//! each component's constructor. Nothing reads configuration ambiently.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main ChronoVault configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Durable storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Session and credential configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Insight pipeline (external generative-text service) configuration
    #[serde(default)]
    pub insight: InsightConfig,
}

impl VaultConfig {
    /// Parse a TOML configuration string.
    pub fn from_toml(content: &str) -> crate::error::Result<Self> {
        toml::from_str(content).map_err(|e| crate::error::Error::Config(e.to_string()))
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS (empty = any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8420,
            cors_origins: Vec::new(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory for all persisted state
    pub base_dir: PathBuf,
}

impl StorageConfig {
    /// Directory holding user records
    pub fn users_dir(&self) -> PathBuf {
        self.base_dir.join("users")
    }

    /// Directory holding capsule records
    pub fn capsules_dir(&self) -> PathBuf {
        self.base_dir.join("capsules")
    }

    /// Directory holding diary entries
    pub fn diary_dir(&self) -> PathBuf {
        self.base_dir.join("diary")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = dirs_next::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chronovault");
        Self { base_dir: base }
    }
}

/// Session and credential configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session lifetime in seconds
    pub session_ttl_secs: u64,

    /// PBKDF2 iteration count for credential hashing
    pub pbkdf2_iterations: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 24 * 60 * 60,
            pbkdf2_iterations: 100_000,
        }
    }
}

/// Insight pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Base URL of the generative-text service
    pub api_url: String,

    /// Environment variable the API key is read from
    pub api_key_ref: String,

    /// Model identifier requested from the service
    pub model: String,

    /// Hard bound on the external call, in seconds. One attempt only;
    /// expiry is treated as failure.
    pub timeout_secs: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_ref: "GEMINI_API_KEY".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout_secs: 10,
        }
    }
}
