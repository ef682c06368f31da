//! ChronoVault - Personal time-capsule vault with diary and AI reflections
//!
//! ChronoVault is an authenticated personal vault: users bury time-locked
//! messages ("capsules") that surface only after a future date, keep a
//! private diary, and can request one-shot AI commentary on diary entries
//! from an external generative-text service.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      HTTP API (axum)                       │
//! │   /auth/*        /capsules*        /diary*    /analyze     │
//! └──────┬──────────────┬─────────────────┬──────────┬─────────┘
//!        │              │                 │          │
//! ┌──────▼─────┐ ┌──────▼──────┐   ┌──────▼────┐ ┌───▼────────┐
//! │ UserStore  │ │ CapsuleStore│   │ DiaryStore│ │  Insight   │
//! │ Sessions   │ │      │      │   │           │ │  Pipeline  │
//! └────────────┘ │ ┌────▼────┐ │   └───────────┘ └───┬────────┘
//!                │ │Classifier│ │                     │ one attempt,
//!                │ │ (pure)   │◄── Clock              │ hard timeout
//!                │ └─────────┘ │                ┌─────▼──────────┐
//!                └─────────────┘                │ generative-text│
//!                                               │ service (HTTP) │
//!                                               └────────────────┘
//! ```
//!
//! The capsule lifecycle classifier is the core: a pure function of the
//! capsule set and an injected clock that partitions capsules into
//! pending / today / history buckets. Everything else is owner-scoped
//! CRUD around it.
//!
//! ## Modules
//!
//! - [`api`]: unified router, health probe, error envelope
//! - [`auth`]: registration, login, bearer sessions, current-owner extraction
//! - [`vault`]: capsule store, lifecycle classifier, handlers
//! - [`diary`]: append-mostly diary entries
//! - [`insight`]: external generative-text boundary
//! - [`clock`]: injectable reference clock
//! - [`config`]: immutable startup configuration

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod diary;
pub mod error;
pub mod insight;
pub mod vault;

pub use config::VaultConfig;
pub use error::{Error, Result};
