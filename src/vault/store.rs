//! Capsule store with file-based JSON persistence
//!
//! Directory layout:
//! ```text
//! <data>/capsules/
//! ├── cap-<uuid>.json
//! └── ...
//! ```
//!
//! Ownership is enforced at this boundary: every read is owner-scoped and
//! deletes silently no-op when the record is missing or foreign-owned, so
//! the API never reveals whether a capsule ID exists under another owner.

use super::types::{parse_unlock_date, Capsule};
use crate::clock::SharedClock;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory capsule store backed by JSON files
pub struct CapsuleStore {
    capsules_dir: PathBuf,
    clock: SharedClock,
    capsules: Arc<RwLock<Vec<Capsule>>>,
}

impl CapsuleStore {
    /// Create a new capsule store at the given directory, loading any
    /// persisted records.
    pub async fn new(capsules_dir: PathBuf, clock: SharedClock) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(&capsules_dir).await?;

        let store = Self {
            capsules_dir,
            clock,
            capsules: Arc::new(RwLock::new(Vec::new())),
        };

        store.load_from_disk().await;
        Ok(store)
    }

    /// Bury a new capsule for `owner`.
    ///
    /// Fails with a validation error when the unlock date is absent or not
    /// `YYYY-MM-DD`; the store is left unchanged. A past date is legal and
    /// lands in history at the next read.
    pub async fn create(&self, owner: Uuid, message: &str, unlock_date: &str) -> Result<Capsule> {
        let unlock_instant = parse_unlock_date(unlock_date)?;

        let capsule = Capsule {
            id: Uuid::new_v4(),
            owner_id: owner,
            message: message.to_string(),
            unlock_instant,
            created_instant: self.clock.now(),
        };

        {
            let mut capsules = self.capsules.write().await;
            capsules.push(capsule.clone());
        }

        self.persist_capsule(&capsule);
        Ok(capsule)
    }

    /// Delete `capsule_id` if it exists and belongs to `owner`.
    ///
    /// A missing or foreign-owned capsule is a silent no-op, not an error:
    /// the response must not reveal whether the ID exists under another
    /// owner. Returns whether a record was actually removed.
    pub async fn delete(&self, owner: Uuid, capsule_id: Uuid) -> bool {
        let removed = {
            let mut capsules = self.capsules.write().await;
            let before = capsules.len();
            capsules.retain(|c| !(c.id == capsule_id && c.owner_id == owner));
            capsules.len() < before
        };

        if removed {
            self.remove_file(capsule_id);
        }
        removed
    }

    /// All capsules belonging to `owner`, unordered. Ordering is the
    /// classifier's job.
    pub async fn list_by_owner(&self, owner: Uuid) -> Vec<Capsule> {
        self.capsules
            .read()
            .await
            .iter()
            .filter(|c| c.owner_id == owner)
            .cloned()
            .collect()
    }

    /// Total number of stored capsules across all owners.
    pub async fn count(&self) -> usize {
        self.capsules.read().await.len()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Load all capsules from disk
    async fn load_from_disk(&self) {
        let capsules = Self::load_json_files::<Capsule>(&self.capsules_dir);
        *self.capsules.write().await = capsules;
    }

    /// Load all JSON files from a directory into a Vec
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

    fn capsule_path(dir: &Path, id: Uuid) -> PathBuf {
        dir.join(format!("cap-{}.json", id))
    }

    /// Persist a single capsule to disk (fire-and-forget)
    fn persist_capsule(&self, capsule: &Capsule) {
        let path = Self::capsule_path(&self.capsules_dir, capsule.id);
        let capsule = capsule.clone();
        tokio::spawn(async move {
            match serde_json::to_string_pretty(&capsule) {
                Ok(json) => {
                    if let Err(e) = tokio::fs::write(&path, json).await {
                        tracing::warn!("Failed to persist capsule {}: {}", capsule.id, e);
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to serialize capsule {}: {}", capsule.id, e);
                }
            }
        });
    }

    /// Remove a capsule's file from disk (fire-and-forget)
    fn remove_file(&self, id: Uuid) {
        let path = Self::capsule_path(&self.capsules_dir, id);
        tokio::spawn(async move {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to remove capsule file {}: {}", path.display(), e);
                }
            }
        });
    }
}
