//! Diary store with file-based JSON persistence
//!
//! Directory layout:
//! ```text
//! <data>/diary/
//! ├── ent-<uuid>.json
//! └── ...
//! ```

use super::types::DiaryEntry;
use crate::clock::SharedClock;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory diary store backed by JSON files
pub struct DiaryStore {
    diary_dir: PathBuf,
    clock: SharedClock,
    entries: Arc<RwLock<Vec<DiaryEntry>>>,
}

impl DiaryStore {
    /// Create a new diary store, loading persisted entries from disk.
    pub async fn new(diary_dir: PathBuf, clock: SharedClock) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(&diary_dir).await?;

        let store = Self {
            diary_dir,
            clock,
            entries: Arc::new(RwLock::new(Vec::new())),
        };

        store.load_from_disk().await;
        Ok(store)
    }

    /// Append an entry for `owner`. Empty content is a validation error;
    /// the HTTP layer chooses whether to surface or swallow it.
    pub async fn append(&self, owner: Uuid, content: &str) -> Result<DiaryEntry> {
        if content.trim().is_empty() {
            return Err(Error::Validation("entry content is required".to_string()));
        }

        let entry = DiaryEntry {
            id: Uuid::new_v4(),
            owner_id: owner,
            content: content.to_string(),
            posted_instant: self.clock.now(),
        };

        {
            let mut entries = self.entries.write().await;
            entries.push(entry.clone());
        }

        self.persist_entry(&entry);
        Ok(entry)
    }

    /// All entries belonging to `owner`, newest first.
    pub async fn list_by_owner(&self, owner: Uuid) -> Vec<DiaryEntry> {
        let mut entries: Vec<DiaryEntry> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.owner_id == owner)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.posted_instant.cmp(&a.posted_instant));
        entries
    }

    /// Fetch a single entry by raw ID, without ownership filtering.
    /// Callers must re-check ownership before acting on the result.
    pub async fn get(&self, id: Uuid) -> Option<DiaryEntry> {
        self.entries.read().await.iter().find(|e| e.id == id).cloned()
    }

    /// Total number of stored entries across all owners.
    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    async fn load_from_disk(&self) {
        let entries = Self::load_json_files::<DiaryEntry>(&self.diary_dir);
        *self.entries.write().await = entries;
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

    /// Persist a single entry to disk (fire-and-forget)
    fn persist_entry(&self, entry: &DiaryEntry) {
        let path = self.diary_dir.join(format!("ent-{}.json", entry.id));
        let entry = entry.clone();
        tokio::spawn(async move {
            match serde_json::to_string_pretty(&entry) {
                Ok(json) => {
                    if let Err(e) = tokio::fs::write(&path, json).await {
                        tracing::warn!("Failed to persist entry {}: {}", entry.id, e);
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to serialize entry {}: {}", entry.id, e);
                }
            }
        });
    }
}
