//! Run settings: one explicit value object, resolved once at startup.
//!
//! Precedence per field is CLI flag, then environment, then the user
//! config file (`~/.config/footfall/config.toml`), then the built-in
//! default. Nothing downstream reads the process environment; whatever
//! a component needs arrives as an argument. The API token is the one
//! field never accepted from the config file, since those tend to be
//! world-readable.
//!
//! Environment names: `GITHUB_REPOSITORY` (the repo, as set by GitHub
//! Actions) and `TRAFFIC_TOKEN` (the PAT the scheduled deployment
//! exports), with `GITHUB_TOKEN` honored as a credential fallback for
//! local shells.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use serde::Deserialize;

use footfall_core::day;

/// Store file written next to wherever the collector runs.
pub const DEFAULT_STORE_FILE: &str = "traffic_data.json";

/// Public GitHub API root; overridable for GitHub Enterprise.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

// ---------------------------------------------------------------------------
// Repo slug
// ---------------------------------------------------------------------------

/// `<owner>/<repo>` identifier for the tracked repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    owner: String,
    repo: String,
}

impl RepoSlug {
    /// Parse an `<owner>/<repo>` string, rejecting empty halves.
    ///
    /// # Errors
    ///
    /// Returns an error when `raw` is not of the form `<owner>/<repo>`.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let Some((owner, repo)) = trimmed.split_once('/') else {
            anyhow::bail!("invalid repo slug '{trimmed}': expected <owner>/<repo>");
        };

        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            anyhow::bail!("invalid repo slug '{trimmed}': expected <owner>/<repo>");
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// The `owner/repo` form used in API paths and messages.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

// ---------------------------------------------------------------------------
// User config file
// ---------------------------------------------------------------------------

/// Optional keys from `~/.config/footfall/config.toml`. Everything is
/// optional; the file itself is optional. There is deliberately no
/// `token` key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserConfig {
    /// Default repository slug.
    #[serde(default)]
    pub repo: Option<String>,
    /// Default date floor (`YYYY-MM-DD`).
    #[serde(default)]
    pub since: Option<String>,
    /// Default store file path.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Default API root.
    #[serde(default)]
    pub api_url: Option<String>,
}

/// Load the user config file, treating "no config dir" and "no file"
/// as an empty config.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("footfall/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("failed to parse {}", path.display()))
}

// ---------------------------------------------------------------------------
// Settings resolution
// ---------------------------------------------------------------------------

/// Flag-level values from the command line; `None` means the flag was
/// not given.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--repo`.
    pub repo: Option<String>,
    /// `--token`.
    pub token: Option<String>,
    /// `--since`.
    pub since: Option<String>,
    /// `--file`.
    pub file: Option<PathBuf>,
    /// `--api-url`.
    pub api_url: Option<String>,
}

/// Everything a collect run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct Settings {
    /// The tracked repository.
    pub repo: RepoSlug,
    /// Bearer token; `None` means unauthenticated calls (GitHub will
    /// reject the traffic endpoints, surfacing as an ordinary fetch
    /// error).
    pub token: Option<String>,
    /// Earliest admissible day for daily entries.
    pub date_floor: Option<String>,
    /// Store file path.
    pub store_path: PathBuf,
    /// API root, no trailing slash.
    pub api_url: String,
}

impl Settings {
    /// Resolve settings from flags, environment, and user config.
    ///
    /// # Errors
    ///
    /// Returns an error when no repository is configured anywhere, or
    /// when the slug or `--since` value is malformed.
    pub fn resolve(overrides: &Overrides, user: &UserConfig) -> Result<Self> {
        Self::resolve_from(
            overrides,
            env::var("GITHUB_REPOSITORY").ok(),
            env::var("TRAFFIC_TOKEN")
                .or_else(|_| env::var("GITHUB_TOKEN"))
                .ok(),
            user,
        )
    }

    // Pure precedence resolution, separated from process state so it
    // can be tested without touching the environment.
    fn resolve_from(
        overrides: &Overrides,
        env_repo: Option<String>,
        env_token: Option<String>,
        user: &UserConfig,
    ) -> Result<Self> {
        let raw_repo = overrides
            .repo
            .clone()
            .or(env_repo)
            .or_else(|| user.repo.clone())
            .context(
                "no repository configured: pass --repo <owner>/<repo>, \
                 set GITHUB_REPOSITORY, or add `repo` to the user config",
            )?;
        let repo = RepoSlug::parse(&raw_repo)?;

        let token = overrides.token.clone().or(env_token);

        let date_floor = overrides.since.clone().or_else(|| user.since.clone());
        if let Some(floor) = &date_floor {
            anyhow::ensure!(
                day::is_day_string(floor),
                "invalid date floor '{floor}': expected YYYY-MM-DD"
            );
        }

        let store_path = resolve_store_path(overrides.file.clone(), user);

        let api_url = overrides
            .api_url
            .clone()
            .or_else(|| user.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = api_url.trim_end_matches('/').to_string();

        Ok(Self {
            repo,
            token,
            date_floor,
            store_path,
            api_url,
        })
    }
}

/// Store-path precedence shared with read-only commands that need no
/// repo or token: flag, then user config, then the default file name.
#[must_use]
pub fn resolve_store_path(flag: Option<PathBuf>, user: &UserConfig) -> PathBuf {
    flag.or_else(|| user.file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
