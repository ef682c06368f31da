//! User store with file-based JSON persistence
//!
//! Directory layout:
//! ```text
//! <data>/users/
//! ├── usr-<uuid>.json
//! └── ...
//! ```
//!
//! Users are created at registration and never deleted by any in-scope
//! operation; the only post-creation write is the avatar reference.

use super::password;
use super::types::User;
use crate::clock::SharedClock;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory user store backed by JSON files
pub struct UserStore {
    users_dir: PathBuf,
    clock: SharedClock,
    pbkdf2_iterations: u32,
    users: Arc<RwLock<Vec<User>>>,
}

impl UserStore {
    /// Create a new user store, loading persisted users from disk.
    pub async fn new(
        users_dir: PathBuf,
        pbkdf2_iterations: u32,
        clock: SharedClock,
    ) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(&users_dir).await?;

        let store = Self {
            users_dir,
            clock,
            pbkdf2_iterations,
            users: Arc::new(RwLock::new(Vec::new())),
        };

        store.load_from_disk().await;
        Ok(store)
    }

    /// Register a new user. The handle must be unique and both fields
    /// non-empty; the password is stored only as a salted hash.
    pub async fn register(&self, handle: &str, password: &str) -> Result<User> {
        let handle = handle.trim();
        if handle.is_empty() {
            return Err(Error::Validation("handle is required".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Validation("password is required".to_string()));
        }

        let credential_hash = password::hash_password(password, self.pbkdf2_iterations);

        let user = {
            let mut users = self.users.write().await;
            if users.iter().any(|u| u.handle == handle) {
                return Err(Error::Validation("Handle already taken".to_string()));
            }
            let user = User {
                id: Uuid::new_v4(),
                handle: handle.to_string(),
                credential_hash,
                avatar_ref: None,
                created_at: self.clock.now(),
            };
            users.push(user.clone());
            user
        };

        self.persist_user(&user);
        Ok(user)
    }

    /// Verify a handle/password pair. Returns the user on success, `None`
    /// on unknown handle or wrong password; callers surface one constant
    /// failure message for both.
    pub async fn verify_login(&self, handle: &str, password: &str) -> Option<User> {
        let user = {
            let users = self.users.read().await;
            users.iter().find(|u| u.handle == handle.trim()).cloned()
        }?;

        if password::verify_password(password, &user.credential_hash) {
            Some(user)
        } else {
            None
        }
    }

    /// Fetch a user by ID.
    pub async fn get(&self, id: Uuid) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    /// Update the avatar reference for `owner`.
    pub async fn set_avatar(&self, owner: Uuid, avatar_ref: &str) -> Result<User> {
        let avatar_ref = avatar_ref.trim();
        if avatar_ref.is_empty() {
            return Err(Error::Validation("avatar reference is required".to_string()));
        }

        let user = {
            let mut users = self.users.write().await;
            let user = users
                .iter_mut()
                .find(|u| u.id == owner)
                .ok_or(Error::NotFoundOrForbidden)?;
            user.avatar_ref = Some(avatar_ref.to_string());
            user.clone()
        };

        self.persist_user(&user);
        Ok(user)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    async fn load_from_disk(&self) {
        let users = Self::load_json_files::<User>(&self.users_dir);
        *self.users.write().await = users;
    }

    fn load_json_files<T: serde::de::DeserializeOwned>(dir: &Path) -> Vec<T> {
        let mut items = Vec::new();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to read directory {}: {}", dir.display(), e);
                }
                return items;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(data) => match serde_json::from_str(&data) {
                    Ok(item) => items.push(item),
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", path.display(), e);
                }
            }
        }

        items
    }

    /// Persist a single user to disk (fire-and-forget)
    fn persist_user(&self, user: &User) {
        let path = self.users_dir.join(format!("usr-{}.json", user.id));
        let user = user.clone();
        tokio::spawn(async move {
            match serde_json::to_string_pretty(&user) {
                Ok(json) => {
                    if let Err(e) = tokio::fs::write(&path, json).await {
                        tracing::warn!("Failed to persist user {}: {}", user.id, e);
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to serialize user {}: {}", user.id, e);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use tempfile::TempDir;

    const TEST_ITERS: u32 = 16;

    async fn make_store() -> (UserStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(FixedClock::at("2024-06-15T12:00:00Z"));
        let store = UserStore::new(dir.path().to_path_buf(), TEST_ITERS, clock)
            .await
            .unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let (store, _dir) = make_store().await;

        let user = store.register("guardian", "hunter2").await.unwrap();
        assert_eq!(user.handle, "guardian");
        assert!(user.credential_hash.starts_with("pbkdf2-sha256$"));
        assert!(user.avatar_ref.is_none());

        let verified = store.verify_login("guardian", "hunter2").await;
        assert_eq!(verified.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (store, _dir) = make_store().await;
        store.register("guardian", "hunter2").await.unwrap();

        assert!(store.verify_login("guardian", "hunter3").await.is_none());
        assert!(store.verify_login("nobody", "hunter2").await.is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_handle() {
        let (store, _dir) = make_store().await;
        store.register("guardian", "one").await.unwrap();

        let result = store.register("guardian", "two").await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_empty_fields() {
        let (store, _dir) = make_store().await;
        assert!(store.register("", "pw").await.is_err());
        assert!(store.register("   ", "pw").await.is_err());
        assert!(store.register("guardian", "").await.is_err());
    }

    #[tokio::test]
    async fn test_set_avatar() {
        let (store, _dir) = make_store().await;
        let user = store.register("guardian", "pw").await.unwrap();

        let updated = store.set_avatar(user.id, "avatars/guardian.png").await.unwrap();
        assert_eq!(updated.avatar_ref.as_deref(), Some("avatars/guardian.png"));

        let fetched = store.get(user.id).await.unwrap();
        assert_eq!(fetched.avatar_ref.as_deref(), Some("avatars/guardian.png"));
    }

    #[tokio::test]
    async fn test_set_avatar_unknown_user() {
        let (store, _dir) = make_store().await;
        let result = store.set_avatar(Uuid::new_v4(), "x.png").await;
        assert!(matches!(result, Err(Error::NotFoundOrForbidden)));
    }

    #[tokio::test]
    async fn test_persistence_round_trip() {
        let dir = TempDir::new().unwrap();
        let clock: SharedClock = Arc::new(FixedClock::at("2024-06-15T12:00:00Z"));

        {
            let store = UserStore::new(dir.path().to_path_buf(), TEST_ITERS, clock.clone())
                .await
                .unwrap();
            store.register("guardian", "hunter2").await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        let store = UserStore::new(dir.path().to_path_buf(), TEST_ITERS, clock)
            .await
            .unwrap();
        let user = store.verify_login("guardian", "hunter2").await;
        assert!(user.is_some());
    }
}
