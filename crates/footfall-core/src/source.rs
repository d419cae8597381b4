//! The fetch seam between the pipeline and the network.
//!
//! [`TrafficSource`] is implemented over HTTP by the CLI and over
//! canned data in tests. Four read operations, one attempt each per
//! run, no retries; the caller aborts on the first error, before the
//! store has been touched.

use crate::model::DailyMetric;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Why a fetch operation failed. Any variant aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The endpoint answered with a non-success HTTP status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        /// Endpoint URL that was called.
        endpoint: String,
        /// HTTP status code received.
        status: u16,
    },

    /// The request produced no HTTP response at all.
    #[error("request to {endpoint} failed: {message}")]
    Transport {
        /// Endpoint URL that was called.
        endpoint: String,
        /// Transport-level failure description.
        message: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("could not decode response from {endpoint}: {message}")]
    Decode {
        /// Endpoint URL that was called.
        endpoint: String,
        /// Decode failure description.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// The source trait
// ---------------------------------------------------------------------------

/// Current values of the repository's cumulative counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoStats {
    /// Stargazer count.
    pub stars: u64,
    /// Fork count.
    pub forks: u64,
}

/// A read-only source of traffic data for one repository.
pub trait TrafficSource {
    /// Daily page views over the source's trailing reporting window.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the upstream call or decode fails.
    fn daily_views(&self) -> Result<Vec<DailyMetric>, FetchError>;

    /// Daily clones over the source's trailing reporting window.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the upstream call or decode fails.
    fn daily_clones(&self) -> Result<Vec<DailyMetric>, FetchError>;

    /// Current star and fork counts.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the upstream call or decode fails.
    fn repo_stats(&self) -> Result<RepoStats, FetchError>;

    /// The top-referrers listing, in whatever shape the source returns.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the upstream call or decode fails.
    fn top_referrers(&self) -> Result<Vec<serde_json::Value>, FetchError>;
}
