//! Insight pipeline
//!
//! Looks up a diary entry by raw identifier, re-checks ownership, builds
//! the fixed mentor prompt and performs exactly one backend call. Success
//! yields a transient insight notice; any backend failure is downgraded to
//! one generic notice and logged. The underlying cause never reaches the
//! caller, and nothing is written anywhere.

use super::backend::GenerativeBackend;
use crate::diary::store::DiaryStore;
use crate::error::{Error, Result};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Generic degraded-mode message shown when the external call fails.
pub const LINK_UNSTABLE_NOTICE: &str = "AI link unstable. Try again later.";

/// Kind of transient notice returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Generated commentary
    Insight,
    /// Degraded mode: the external link failed
    Error,
}

/// A one-shot notification; never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightNotice {
    pub kind: NoticeKind,
    pub notice: String,
}

/// Pipeline from diary entry to transient AI commentary.
pub struct InsightPipeline {
    backend: Arc<dyn GenerativeBackend>,
    diary: Arc<DiaryStore>,
}

impl InsightPipeline {
    pub fn new(backend: Arc<dyn GenerativeBackend>, diary: Arc<DiaryStore>) -> Self {
        Self { backend, diary }
    }

    /// Analyze the entry identified by `entry_id` on behalf of `owner`.
    ///
    /// The entry is looked up by raw identifier, so ownership is re-checked
    /// here even though diary listings are already owner-scoped. A missing
    /// entry and a foreign entry are indistinguishable to the caller.
    pub async fn analyze(&self, owner: Uuid, entry_id: Uuid) -> Result<InsightNotice> {
        let entry = self
            .diary
            .get(entry_id)
            .await
            .ok_or(Error::NotFoundOrForbidden)?;
        if entry.owner_id != owner {
            return Err(Error::NotFoundOrForbidden);
        }

        let prompt = build_prompt(&entry.content);

        // One attempt; the timeout lives in the backend.
        match self.backend.generate(&prompt).await {
            Ok(text) => Ok(InsightNotice {
                kind: NoticeKind::Insight,
                notice: text,
            }),
            Err(e) => {
                tracing::warn!(entry = %entry_id, "insight generation failed: {}", e);
                Ok(InsightNotice {
                    kind: NoticeKind::Error,
                    notice: LINK_UNSTABLE_NOTICE.to_string(),
                })
            }
        }
    }
}

/// Fixed mentor prompt embedding the entry content.
pub fn build_prompt(content: &str) -> String {
    format!(
        "You are the 'Chronos AI' mentor. Analyze this diary entry: \"{}\"\n\
         Provide a brief summary, a motivational insight, and one futuristic quote.\n\
         Tone: Empathetic, encouraging, and Cyber-Pink themed.",
        content
    )
}
