//! Capsule lifecycle classifier
//!
//! Partitions a single owner's capsules relative to a reference instant:
//!
//! - **today**: unlock date equals the reference calendar date (UTC),
//!   time-of-day ignored.
//! - **pending**: unlock instant strictly after the reference instant,
//!   ascending (soonest first; the countdown display contract).
//! - **history**: unlock instant at or before the reference instant,
//!   descending (most recently unlocked first).
//!
//! The today and history predicates are independent, so a capsule that
//! unlocked earlier today appears in both buckets. The main view renders
//! both, and that double appearance is the product's documented behavior;
//! do not deduplicate here.
//!
//! Pure function of `(now, capsules)`: no clock reads, no side effects.

use super::types::Capsule;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Display classification of a capsule set at a given instant.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Buckets {
    pub pending: Vec<Capsule>,
    pub today: Vec<Capsule>,
    pub history: Vec<Capsule>,
}

/// Partition `capsules` into pending / today / history buckets at `now`.
pub fn classify(now: DateTime<Utc>, capsules: &[Capsule]) -> Buckets {
    let today_date = now.date_naive();

    let today = capsules
        .iter()
        .filter(|c| c.unlock_instant.date_naive() == today_date)
        .cloned()
        .collect();

    let mut pending: Vec<Capsule> = capsules
        .iter()
        .filter(|c| c.unlock_instant > now)
        .cloned()
        .collect();
    pending.sort_by(|a, b| a.unlock_instant.cmp(&b.unlock_instant));

    let history = history_only(now, capsules);

    Buckets {
        pending,
        today,
        history,
    }
}

/// The history-only view: capsules whose unlock instant has passed,
/// descending. Applies only the `unlock_instant <= now` predicate, with no
/// today overlay.
pub fn history_only(now: DateTime<Utc>, capsules: &[Capsule]) -> Vec<Capsule> {
    let mut history: Vec<Capsule> = capsules
        .iter()
        .filter(|c| c.unlock_instant <= now)
        .cloned()
        .collect();
    history.sort_by(|a, b| b.unlock_instant.cmp(&a.unlock_instant));
    history
}
