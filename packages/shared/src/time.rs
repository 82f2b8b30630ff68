use chrono::{DateTime, FixedOffset, Utc};

fn jst_offset() -> FixedOffset {
    // 9 * 3600 is always within ±24h, so this cannot fail
    FixedOffset::east_opt(9 * 3600).unwrap()
}

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let now_jst: DateTime<FixedOffset> = Utc::now().with_timezone(&jst_offset());
    now_jst.timestamp_millis()
}

/// Format a Unix millisecond timestamp as an RFC 3339 string in JST.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_jst_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .with_timezone(&jst_offset())
        .to_rfc3339()
}
