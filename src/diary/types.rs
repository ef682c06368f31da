//! Diary wire and storage types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A diary entry owned by exactly one user. Append-only: no edit or
/// delete operation exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub posted_instant: DateTime<Utc>,
}

/// Request body for posting an entry
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEntryRequest {
    #[serde(default)]
    pub content: String,
}

/// Diary view envelope
#[derive(Debug, Serialize)]
pub struct DiaryResponse {
    pub entries: Vec<DiaryEntry>,
}
