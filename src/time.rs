//! Timestamp helpers.
//!
//! Unified events carry `timestamp_sent` as Unix epoch milliseconds.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::DateTime;

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_millis() -> i64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

/// Parse an RFC 3339 timestamp such as `2024-05-01T12:00:00.250Z` into
/// Unix epoch milliseconds.
pub fn parse_rfc3339_millis(ts: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.timestamp_millis())
}
