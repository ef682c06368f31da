//! Private diary subsystem
//!
//! Append-mostly entries owned by a single user, retrieved newest-first.
//! There is no edit or delete; the insight pipeline reads entries on
//! demand.

pub mod handler;
pub mod store;
pub mod types;

pub use handler::{diary_router, DiaryState};
pub use store::DiaryStore;
pub use types::DiaryEntry;
