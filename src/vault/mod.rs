//! Time-capsule subsystem
//!
//! A capsule is a sealed message that becomes visible once its unlock
//! instant has passed. The [`classifier`] partitions a user's capsules into
//! pending / today / history buckets relative to an injected clock; the
//! [`store`] owns durability and the ownership invariant.

pub mod classifier;
pub mod handler;
pub mod store;
pub mod types;

pub use classifier::{classify, history_only, Buckets};
pub use handler::{vault_router, VaultState};
pub use store::CapsuleStore;
pub use types::{BuryRequest, Capsule};
