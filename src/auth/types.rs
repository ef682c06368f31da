//! User types for the auth API
//!
//! The stored [`User`] carries the credential hash; [`UserProfile`] is the
//! wire shape and never exposes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user as persisted in the user store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// Unique login handle
    pub handle: String,
    /// Salted PBKDF2-SHA256 credential hash; never plaintext
    pub credential_hash: String,
    /// Reference to an avatar image managed outside this service
    pub avatar_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public profile shape returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub handle: String,
    pub avatar_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            handle: user.handle.clone(),
            avatar_ref: user.avatar_ref.clone(),
            created_at: user.created_at,
        }
    }
}

/// Request body for registration and login
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub handle: String,
    pub password: String,
}

/// Request body for updating the avatar reference
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAvatarRequest {
    pub avatar_ref: String,
}

/// Response body for a successful login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_hides_credential_hash() {
        let user = User {
            id: Uuid::new_v4(),
            handle: "guardian".to_string(),
            credential_hash: "pbkdf2-sha256$1$abc$def".to_string(),
            avatar_ref: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&UserProfile::from(&user)).unwrap();
        assert!(json.contains("\"handle\":\"guardian\""));
        assert!(!json.contains("credential"));
        assert!(!json.contains("pbkdf2"));
    }
}
