//! Block-time utilities
//!
//! Confirmed transactions carry an optional epoch-seconds block time. These
//! helpers render it for logs and feed display so chrono handling stays in
//! one place.

use chrono::DateTime;

/// Convert an epoch-seconds block time to an ISO 8601 instant
/// (YYYY-MM-DDTHH:MM:SSZ).
///
/// Returns `None` for timestamps chrono cannot represent.
///
/// # Examples
/// ```
/// use tx_indexer::utils::time::block_time_to_iso;
///
/// assert_eq!(
///     block_time_to_iso(1704067200).as_deref(),
///     Some("2024-01-01T00:00:00Z")
/// );
/// assert_eq!(block_time_to_iso(i64::MAX), None);
/// ```
pub fn block_time_to_iso(block_time: i64) -> Option<String> {
    DateTime::from_timestamp(block_time, 0)
        .map(|instant| instant.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Render an optional block time for display. Absent or unrepresentable
/// block times (old slots, unfinalised transactions) read as "unconfirmed".
///
/// # Examples
/// ```
/// use tx_indexer::utils::time::format_block_time;
///
/// assert_eq!(format_block_time(Some(1704067200)), "2024-01-01T00:00:00Z");
/// assert_eq!(format_block_time(None), "unconfirmed");
/// ```
pub fn format_block_time(block_time: Option<i64>) -> String {
    block_time
        .and_then(block_time_to_iso)
        .unwrap_or_else(|| "unconfirmed".to_string())
}
