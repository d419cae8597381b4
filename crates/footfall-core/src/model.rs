//! Persisted data model for the traffic store.
//!
//! The store is a single JSON document holding five time series plus a
//! last-updated stamp. Timestamps are kept as ISO-8601 strings and used
//! directly as sort and identity keys: on this format, lexicographic
//! order equals chronological order, so no parsing is required anywhere
//! in the merge or pruning paths.
//!
//! # Invariants
//!
//! - Within each series, timestamps are unique and sorted ascending.
//! - Daily series (`views`, `clones`) carry one entry per observed day.
//! - Snapshot series (`stars`, `forks`, `referrers`) carry at most one
//!   entry per calendar day; a newer same-day entry replaces the older.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Series entry types
// ---------------------------------------------------------------------------

/// One day of a counted-plus-uniques metric (views or clones), exactly
/// as the upstream API reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMetric {
    /// Day-start timestamp, e.g. `"2024-06-01T00:00:00Z"`.
    pub timestamp: String,
    /// Total hits for the day.
    pub count: u64,
    /// Unique visitors for the day.
    pub uniques: u64,
}

/// A point-in-time reading of a cumulative counter (stars or forks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountSnapshot {
    /// Day-start timestamp of the reading.
    pub timestamp: String,
    /// Counter value at that time.
    pub count: u64,
}

/// A daily capture of the top-referrers listing, carried opaquely in
/// whatever shape the upstream API returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferrerSnapshot {
    /// Day-start timestamp of the capture.
    pub timestamp: String,
    /// The raw referrer listing.
    pub data: Vec<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// The store document
// ---------------------------------------------------------------------------

/// The whole on-disk document. Every series defaults to empty so a
/// file written by an older version (or a hand-trimmed one) still
/// deserializes; absent keys simply mean "no history yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficStore {
    /// Daily page-view counts.
    #[serde(default)]
    pub views: Vec<DailyMetric>,
    /// Daily clone counts.
    #[serde(default)]
    pub clones: Vec<DailyMetric>,
    /// Daily stargazer-count snapshots.
    #[serde(default)]
    pub stars: Vec<CountSnapshot>,
    /// Daily fork-count snapshots.
    #[serde(default)]
    pub forks: Vec<CountSnapshot>,
    /// Daily top-referrer captures.
    #[serde(default)]
    pub referrers: Vec<ReferrerSnapshot>,
    /// Wall-clock time of the last successful write, formatted
    /// `YYYY-MM-DD HH:MM:SS UTC`. Empty until the first write.
    #[serde(default)]
    pub updated_at: String,
}

impl TrafficStore {
    /// Total number of entries across all five series.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.views.len()
            + self.clones.len()
            + self.stars.len()
            + self.forks.len()
            + self.referrers.len()
    }
}

// ---------------------------------------------------------------------------
// Timestamp access across entry types
// ---------------------------------------------------------------------------

/// Uniform timestamp access for series entries, so pruning can treat
/// all five series alike.
pub trait Timestamped {
    /// The entry's ISO-8601 timestamp string.
    fn timestamp(&self) -> &str;
}

impl Timestamped for DailyMetric {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl Timestamped for CountSnapshot {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl Timestamped for ReferrerSnapshot {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}
