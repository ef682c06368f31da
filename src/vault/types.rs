//! Capsule wire and storage types
//!
//! All wire types use camelCase JSON serialization.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sealed, time-locked message owned by exactly one user.
///
/// `owner_id` and `unlock_instant` are set once at creation and never
/// mutated; the only write after creation is wholesale deletion by the
/// owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capsule {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub message: String,
    /// Instant the capsule unlocks (start-of-day UTC of the buried date)
    pub unlock_instant: DateTime<Utc>,
    /// Creation timestamp, informational only
    pub created_instant: DateTime<Utc>,
}

/// Request body for burying a capsule
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuryRequest {
    pub message: String,
    /// Unlock date in `YYYY-MM-DD` form
    pub unlock_date: String,
}

/// Parse a `YYYY-MM-DD` unlock date into its start-of-day UTC instant.
///
/// No lower bound is enforced: a past date is legal and the capsule lands
/// in history immediately.
pub fn parse_unlock_date(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("unlock date is required".to_string()));
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| Error::Validation(format!("invalid unlock date: {}", trimmed)))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::Validation(format!("invalid unlock date: {}", trimmed)))?;
    Ok(DateTime::from_naive_utc_and_offset(midnight, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unlock_date_valid() {
        let instant = parse_unlock_date("2024-06-20").unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-06-20T00:00:00+00:00");
    }

    #[test]
    fn test_parse_unlock_date_trims_whitespace() {
        let instant = parse_unlock_date(" 2024-06-20 ").unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-06-20T00:00:00+00:00");
    }

    #[test]
    fn test_parse_unlock_date_rejects_garbage() {
        assert!(matches!(
            parse_unlock_date("not-a-date"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            parse_unlock_date("2024-13-40"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            parse_unlock_date("20/06/2024"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_parse_unlock_date_rejects_empty() {
        assert!(matches!(parse_unlock_date(""), Err(Error::Validation(_))));
        assert!(matches!(parse_unlock_date("   "), Err(Error::Validation(_))));
    }

    #[test]
    fn test_parse_unlock_date_past_is_legal() {
        assert!(parse_unlock_date("1999-01-01").is_ok());
    }

    #[test]
    fn test_capsule_serialization_camel_case() {
        let capsule = Capsule {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            message: "hello future".to_string(),
            unlock_instant: parse_unlock_date("2030-01-01").unwrap(),
            created_instant: Utc::now(),
        };
        let json = serde_json::to_string(&capsule).unwrap();
        assert!(json.contains("\"ownerId\""));
        assert!(json.contains("\"unlockInstant\""));
        assert!(json.contains("\"createdInstant\""));

        let parsed: Capsule = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, capsule.id);
        assert_eq!(parsed.unlock_instant, capsule.unlock_instant);
    }
}
