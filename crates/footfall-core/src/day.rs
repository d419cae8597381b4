//! Calendar-day helpers for string timestamps.
//!
//! Every timestamp in the store is an ISO-8601 string, and every
//! comparison (sorting, the date floor, the retention cutoff) is a
//! plain string comparison on the `YYYY-MM-DD` day portion. That only
//! works while the strings stay canonical (zero-padded, UTC), which is
//! why [`is_day_string`] rejects non-canonical forms instead of
//! normalizing them. `chrono` is used solely to obtain "now" and for
//! the cutoff arithmetic; stored values are never parsed back.

use chrono::Utc;

/// Number of trailing days of history kept in the store.
pub const RETENTION_DAYS: i64 = 365;

/// The day portion of an ISO-8601 timestamp (first 10 bytes,
/// `YYYY-MM-DD`). Strings shorter than a day are returned unchanged.
#[must_use]
pub fn day_of(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

/// Whether `value` is a canonical `YYYY-MM-DD` day-string. Canonical
/// form is required wherever day-strings are compared lexicographically;
/// `"2024-6-1"` would sort before `"2024-05-01"`.
#[must_use]
pub fn is_day_string(value: &str) -> bool {
    value.len() == 10 && chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Today's UTC day-start timestamp, e.g. `"2024-06-01T00:00:00Z"`.
#[must_use]
pub fn today_day_start() -> String {
    Utc::now().format("%Y-%m-%dT00:00:00Z").to_string()
}

/// The oldest retained day: [`RETENTION_DAYS`] before the current UTC
/// time, as a `YYYY-MM-DD` day-string.
#[must_use]
pub fn retention_cutoff_day() -> String {
    let cutoff = Utc::now() - chrono::Duration::days(RETENTION_DAYS);
    cutoff.format("%Y-%m-%d").to_string()
}

/// Wall-clock stamp for the store's `updated_at` field, e.g.
/// `"2024-06-01 12:30:00 UTC"`.
#[must_use]
pub fn updated_at_stamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
