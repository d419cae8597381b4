//! Series reconciliation: merging fetched history and recording daily
//! snapshots.
//!
//! Daily series (views, clones) merge by timestamp key: the union of
//! old and new entries, with the incoming entry winning whenever both
//! sides carry the same timestamp. The upstream API re-reports a
//! trailing window (about two weeks) on every call, and the most
//! recent day's numbers keep moving until the day is over, so
//! incoming-wins is what keeps partial days converging toward their
//! final value. Merging the same batch twice is a no-op.
//!
//! Snapshot series (stars, forks, referrers) do not merge at all: a
//! run replaces any entry already recorded for the same calendar day,
//! leaving one reading per day.
//!
//! # Invariants
//!
//! - Output series are unique by timestamp and sorted ascending.
//! - The date floor only blocks *admission* of daily entries; it never
//!   removes entries that merged before the floor was raised. Retiring
//!   old history is the retention pruner's job alone.

use std::collections::BTreeMap;

use crate::day::day_of;
use crate::model::{CountSnapshot, DailyMetric, ReferrerSnapshot};

// ---------------------------------------------------------------------------
// Daily series merge
// ---------------------------------------------------------------------------

/// Merge `incoming` daily entries into `existing`, keyed by timestamp.
///
/// On a key collision the incoming entry wins. Entries whose day
/// portion is earlier than `date_floor` (when set) are skipped. The
/// result is sorted ascending and unique by timestamp regardless of
/// input order.
#[must_use]
pub fn merge_daily(
    existing: &[DailyMetric],
    incoming: &[DailyMetric],
    date_floor: Option<&str>,
) -> Vec<DailyMetric> {
    let mut by_timestamp: BTreeMap<String, DailyMetric> = existing
        .iter()
        .map(|entry| (entry.timestamp.clone(), entry.clone()))
        .collect();

    for entry in incoming {
        if let Some(floor) = date_floor {
            if day_of(&entry.timestamp) < floor {
                tracing::debug!(
                    timestamp = %entry.timestamp,
                    floor,
                    "skipping daily entry below the date floor"
                );
                continue;
            }
        }
        by_timestamp.insert(entry.timestamp.clone(), entry.clone());
    }

    by_timestamp.into_values().collect()
}

// ---------------------------------------------------------------------------
// Daily snapshots
// ---------------------------------------------------------------------------

/// Record a counter reading for `today`, replacing any entry already
/// recorded on the same calendar day. Keeps the series sorted.
pub fn record_count(series: &mut Vec<CountSnapshot>, today: &str, count: u64) {
    series.retain(|snapshot| day_of(&snapshot.timestamp) != day_of(today));
    series.push(CountSnapshot {
        timestamp: today.to_string(),
        count,
    });
    series.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
}

/// Record today's referrer listing, replacing any same-day capture.
pub fn record_referrers(
    series: &mut Vec<ReferrerSnapshot>,
    today: &str,
    data: Vec<serde_json::Value>,
) {
    series.retain(|snapshot| day_of(&snapshot.timestamp) != day_of(today));
    series.push(ReferrerSnapshot {
        timestamp: today.to_string(),
        data,
    });
    series.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
