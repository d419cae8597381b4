//! GitHub-backed [`TrafficSource`] over blocking HTTP.
//!
//! Four endpoints, each called once per run:
//! `/repos/{repo}/traffic/views`, `/repos/{repo}/traffic/clones`,
//! `/repos/{repo}` (star and fork counts), and
//! `/repos/{repo}/traffic/popular/referrers`. The traffic endpoints
//! require a token with push access to the repository; without one
//! GitHub answers 403, which surfaces as an ordinary status error and
//! aborts the run.

use std::cell::Cell;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use footfall_core::model::DailyMetric;
use footfall_core::source::{FetchError, RepoStats, TrafficSource};

const USER_AGENT: &str = "footfall";

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Blocking GitHub REST client for one repository.
pub struct GithubClient {
    api_url: String,
    repo: String,
    token: Option<String>,
    requests: Cell<usize>,
}

impl GithubClient {
    /// Client for `repo` (`owner/repo`) against `api_url` (no trailing
    /// slash).
    #[must_use]
    pub fn new(api_url: String, repo: String, token: Option<String>) -> Self {
        Self {
            api_url,
            repo,
            token,
            requests: Cell::new(0),
        }
    }

    /// Number of HTTP requests issued so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.get()
    }

    fn endpoint(&self, tail: &str) -> String {
        format!("{}/repos/{}{}", self.api_url, self.repo, tail)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        self.requests.set(self.requests.get() + 1);
        tracing::debug!(url, "GET");

        let mut request = ureq::get(url)
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", USER_AGENT);

        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let response = request.call().map_err(|err| match err {
            ureq::Error::Status(status, _) => FetchError::Status {
                endpoint: url.to_string(),
                status,
            },
            ureq::Error::Transport(transport) => FetchError::Transport {
                endpoint: url.to_string(),
                message: transport.to_string(),
            },
        })?;

        response.into_json::<T>().map_err(|err| FetchError::Decode {
            endpoint: url.to_string(),
            message: err.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Payload envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ViewsPayload {
    #[serde(default)]
    views: Vec<DailyMetric>,
}

#[derive(Debug, Deserialize)]
struct ClonesPayload {
    #[serde(default)]
    clones: Vec<DailyMetric>,
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
}

impl TrafficSource for GithubClient {
    fn daily_views(&self) -> Result<Vec<DailyMetric>, FetchError> {
        let url = self.endpoint("/traffic/views");
        let payload: ViewsPayload = self.get_json(&url)?;
        Ok(payload.views)
    }

    fn daily_clones(&self) -> Result<Vec<DailyMetric>, FetchError> {
        let url = self.endpoint("/traffic/clones");
        let payload: ClonesPayload = self.get_json(&url)?;
        Ok(payload.clones)
    }

    fn repo_stats(&self) -> Result<RepoStats, FetchError> {
        let url = self.endpoint("");
        let info: RepoInfo = self.get_json(&url)?;
        Ok(RepoStats {
            stars: info.stargazers_count,
            forks: info.forks_count,
        })
    }

    fn top_referrers(&self) -> Result<Vec<serde_json::Value>, FetchError> {
        let url = self.endpoint("/traffic/popular/referrers");
        self.get_json(&url)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GithubClient {
        GithubClient::new(
            "https://api.github.com".to_string(),
            "octocat/hello-world".to_string(),
            None,
        )
    }

    #[test]
    fn endpoint_urls_follow_the_api_layout() {
        let client = client();
        assert_eq!(
            client.endpoint("/traffic/views"),
            "https://api.github.com/repos/octocat/hello-world/traffic/views"
        );
        assert_eq!(
            client.endpoint("/traffic/clones"),
            "https://api.github.com/repos/octocat/hello-world/traffic/clones"
        );
        assert_eq!(
            client.endpoint(""),
            "https://api.github.com/repos/octocat/hello-world"
        );
        assert_eq!(
            client.endpoint("/traffic/popular/referrers"),
            "https://api.github.com/repos/octocat/hello-world/traffic/popular/referrers"
        );
    }

    #[test]
    fn views_payload_decodes_the_api_shape() {
        let payload: ViewsPayload = serde_json::from_value(serde_json::json!({
            "count": 368,
            "uniques": 116,
            "views": [
                {"timestamp": "2024-06-01T00:00:00Z", "count": 128, "uniques": 52},
                {"timestamp": "2024-06-02T00:00:00Z", "count": 240, "uniques": 64}
            ]
        }))
        .expect("decode");
        assert_eq!(payload.views.len(), 2);
        assert_eq!(payload.views[0].count, 128);
        assert_eq!(payload.views[1].timestamp, "2024-06-02T00:00:00Z");
    }

    #[test]
    fn clones_payload_tolerates_an_empty_window() {
        let payload: ClonesPayload =
            serde_json::from_value(serde_json::json!({"count": 0, "uniques": 0}))
                .expect("decode");
        assert!(payload.clones.is_empty());
    }

    #[test]
    fn repo_info_decodes_counts() {
        let info: RepoInfo = serde_json::from_value(serde_json::json!({
            "id": 1296269,
            "full_name": "octocat/hello-world",
            "stargazers_count": 1510,
            "forks_count": 77,
            "open_issues_count": 140
        }))
        .expect("decode");
        assert_eq!(info.stargazers_count, 1510);
        assert_eq!(info.forks_count, 77);
    }

    #[test]
    fn unroutable_host_maps_to_a_transport_error() {
        let client = GithubClient::new(
            "http://127.0.0.1:9".to_string(),
            "octocat/hello-world".to_string(),
            None,
        );
        let err = client.daily_views().expect_err("nothing listens on port 9");
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(client.request_count(), 1);
    }
}
