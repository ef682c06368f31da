//! Authentication and session management
//!
//! Registration, login and opaque bearer sessions. Every vault, diary and
//! insight operation resolves the current owner through [`CurrentOwner`]
//! and trusts that identity; nothing below this module re-verifies
//! credentials.

pub mod handler;
pub mod password;
pub mod session;
pub mod store;
pub mod types;

pub use handler::{auth_router, AuthState};
pub use session::{CurrentOwner, SessionManager};
pub use store::UserStore;
pub use types::{User, UserProfile};
