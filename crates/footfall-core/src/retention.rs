//! Retention pruning: retire entries older than the rolling window.
//!
//! Runs after every successful merge. The cutoff is a `YYYY-MM-DD`
//! day-string ([`crate::day::retention_cutoff_day`]); an entry stays
//! when its day portion is greater than or equal to the cutoff, so the
//! cutoff day itself is retained. This is the only mechanism that ever
//! removes history from the store.

use crate::day::day_of;
use crate::model::{Timestamped, TrafficStore};

/// Drop entries older than `cutoff_day` from one series. Returns the
/// number of entries removed.
pub fn prune_series<T: Timestamped>(series: &mut Vec<T>, cutoff_day: &str) -> usize {
    let before = series.len();
    series.retain(|entry| day_of(entry.timestamp()) >= cutoff_day);
    before - series.len()
}

/// Prune all five series. Returns the total number of entries removed.
pub fn prune_store(store: &mut TrafficStore, cutoff_day: &str) -> usize {
    let removed = prune_series(&mut store.views, cutoff_day)
        + prune_series(&mut store.clones, cutoff_day)
        + prune_series(&mut store.stars, cutoff_day)
        + prune_series(&mut store.forks, cutoff_day)
        + prune_series(&mut store.referrers, cutoff_day);
    if removed > 0 {
        tracing::debug!(removed, cutoff_day, "pruned entries past retention");
    }
    removed
}
