//! Reference clock abstraction
//!
//! Bucket classification is a pure function of the capsule set and the
//! current instant, so the instant is injected rather than read ambiently.
//! Production code uses [`SystemClock`]; tests pin a [`FixedClock`].
//! A single reference zone (UTC) is assumed throughout.

use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Supplies the current instant in the single reference time zone.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation backed by the platform clock.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant, for deterministic tests.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    /// Create a clock frozen at the given instant.
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    /// Parse an RFC 3339 timestamp into a fixed clock.
    ///
    /// Panics on malformed input; intended for test fixtures only.
    pub fn at(rfc3339: &str) -> Self {
        Self::new(
            DateTime::parse_from_rfc3339(rfc3339)
                .expect("valid RFC 3339 timestamp")
                .with_timezone(&Utc),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// Shared trait-object handle used by components that need the time.
pub type SharedClock = Arc<dyn Clock>;
