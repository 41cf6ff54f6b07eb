//! Timestamp parsing for REST API date-time strings

use chrono::{DateTime, Utc};

/// Parse a REST API timestamp such as `2024-01-15T10:30:00.000+0000`.
///
/// RFC 3339 input (`+00:00` offsets, `Z`) is accepted as well. Returns
/// `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
