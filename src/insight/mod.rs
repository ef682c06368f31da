//! AI insight subsystem
//!
//! On demand, a diary entry's text is embedded in a fixed mentor prompt
//! and sent to an external generative-text service. The result is a
//! transient notification, never persisted. Exactly one attempt per
//! invocation; every failure mode collapses to one generic notice.

pub mod backend;
pub mod handler;
pub mod pipeline;

pub use backend::{GenerativeBackend, HttpGenerativeBackend};
pub use handler::{insight_router, InsightState};
pub use pipeline::{InsightNotice, InsightPipeline, NoticeKind};
