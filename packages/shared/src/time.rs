//! Timestamp helpers.
//!
//! Server-assigned timestamps are Unix epochs in milliseconds, in JST.

use chrono::{DateTime, FixedOffset, Utc};

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let jst_offset = FixedOffset::east_opt(9 * 3600).unwrap(); // JST is UTC+9
    let now_utc = Utc::now();
    let now_jst: DateTime<FixedOffset> = now_utc.with_timezone(&jst_offset);
    now_jst.timestamp_millis()
}

/// Render a millisecond timestamp as an RFC 3339 string in JST.
///
/// Returns an empty string for timestamps outside the representable range.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    let jst_offset = FixedOffset::east_opt(9 * 3600).unwrap();
    DateTime::from_timestamp_millis(timestamp_millis)
        .map(|dt| dt.with_timezone(&jst_offset).to_rfc3339())
        .unwrap_or_default()
}
