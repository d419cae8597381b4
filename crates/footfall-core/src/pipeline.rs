//! The collect pipeline: fetch everything, then apply it to the store.
//!
//! Fetching and applying are deliberately split so that failure
//! atomicity is structural rather than careful: [`fetch_all`] completes
//! (or fails) before the store is touched, and the caller persists the
//! store only after [`apply`] returns. Fetches run strictly in order
//! (views, clones, repository stats, referrers), one attempt each,
//! aborting on the first error.

use crate::day;
use crate::merge::{merge_daily, record_count, record_referrers};
use crate::model::{DailyMetric, TrafficStore};
use crate::retention::prune_store;
use crate::source::{FetchError, RepoStats, TrafficSource};

// ---------------------------------------------------------------------------
// Fetch phase
// ---------------------------------------------------------------------------

/// Everything one run fetches, gathered before any store mutation.
#[derive(Debug, Clone)]
pub struct FetchedMetrics {
    /// Daily page views from the trailing reporting window.
    pub views: Vec<DailyMetric>,
    /// Daily clones from the trailing reporting window.
    pub clones: Vec<DailyMetric>,
    /// Current star and fork counts.
    pub stats: RepoStats,
    /// Today's top-referrer listing.
    pub referrers: Vec<serde_json::Value>,
}

/// Fetch all four data shapes in pipeline order.
///
/// # Errors
///
/// Returns the first [`FetchError`] encountered; later stages are not
/// attempted.
pub fn fetch_all(source: &dyn TrafficSource) -> Result<FetchedMetrics, FetchError> {
    tracing::debug!("fetching daily views");
    let views = source.daily_views()?;
    tracing::debug!("fetching daily clones");
    let clones = source.daily_clones()?;
    tracing::debug!("fetching repository stats");
    let stats = source.repo_stats()?;
    tracing::debug!("fetching top referrers");
    let referrers = source.top_referrers()?;

    Ok(FetchedMetrics {
        views,
        clones,
        stats,
        referrers,
    })
}

// ---------------------------------------------------------------------------
// Apply phase
// ---------------------------------------------------------------------------

/// Clock and filter inputs for one run, captured once up front so every
/// stage sees the same "now".
#[derive(Debug, Clone)]
pub struct RunWindow {
    /// Today's UTC day-start timestamp, used by the snapshot series.
    pub today: String,
    /// Oldest retained day (`YYYY-MM-DD`).
    pub cutoff_day: String,
    /// Optional earliest admissible day for daily entries.
    pub date_floor: Option<String>,
}

impl RunWindow {
    /// The window for a run starting now.
    #[must_use]
    pub fn current(date_floor: Option<String>) -> Self {
        Self {
            today: day::today_day_start(),
            cutoff_day: day::retention_cutoff_day(),
            date_floor,
        }
    }
}

/// Per-series totals after a run, for the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MergeOutcome {
    /// Entries in the views series after the run.
    pub views: usize,
    /// Entries in the clones series after the run.
    pub clones: usize,
    /// Entries in the stars series after the run.
    pub stars: usize,
    /// Entries in the forks series after the run.
    pub forks: usize,
    /// Entries in the referrers series after the run.
    pub referrers: usize,
    /// Entries removed by retention pruning.
    pub pruned: usize,
}

/// Apply fetched metrics to the store: merge the daily series, record
/// today's snapshots, then prune past retention.
pub fn apply(
    store: &mut TrafficStore,
    fetched: &FetchedMetrics,
    window: &RunWindow,
) -> MergeOutcome {
    let floor = window.date_floor.as_deref();
    store.views = merge_daily(&store.views, &fetched.views, floor);
    store.clones = merge_daily(&store.clones, &fetched.clones, floor);
    record_count(&mut store.stars, &window.today, fetched.stats.stars);
    record_count(&mut store.forks, &window.today, fetched.stats.forks);
    record_referrers(&mut store.referrers, &window.today, fetched.referrers.clone());
    let pruned = prune_store(store, &window.cutoff_day);

    MergeOutcome {
        views: store.views.len(),
        clones: store.clones.len(),
        stars: store.stars.len(),
        forks: store.forks.len(),
        referrers: store.referrers.len(),
        pruned,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
