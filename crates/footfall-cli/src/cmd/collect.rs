//! `footfall collect`: one full archive run.
//!
//! Load the store, fetch the four data shapes, merge, snapshot, prune,
//! write. The store file is touched only after every fetch has
//! succeeded, so a failed run exits non-zero and leaves the previous
//! file exactly as it was.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;

use footfall_core::pipeline::{self, RunWindow};
use footfall_core::store;

use crate::github::GithubClient;
use crate::settings::{self, Overrides, Settings};

#[derive(Args, Debug, Default)]
pub struct CollectArgs {
    /// Repository to collect, as <owner>/<repo>
    ///
    /// Falls back to the GITHUB_REPOSITORY environment variable, then
    /// the `repo` key of the user config.
    #[arg(long, value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// API token with access to the repository's traffic data
    ///
    /// Falls back to the TRAFFIC_TOKEN environment variable, then
    /// GITHUB_TOKEN. Never read from the config file.
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Ignore fetched daily entries from days earlier than this
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub since: Option<String>,

    /// Store file to read and write
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// API root URL, for GitHub Enterprise hosts
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Fetch and merge but skip the final write
    #[arg(long)]
    pub dry_run: bool,

    /// Output the run report as JSON
    #[arg(long)]
    pub json: bool,
}

impl CollectArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            repo: self.repo.clone(),
            token: self.token.clone(),
            since: self.since.clone(),
            file: self.file.clone(),
            api_url: self.api_url.clone(),
        }
    }
}

/// What one run did, in both output formats.
#[derive(Debug, Serialize)]
struct CollectReport {
    repo: String,
    store_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_floor: Option<String>,
    views: usize,
    clones: usize,
    stars: usize,
    forks: usize,
    referrers: usize,
    pruned: usize,
    api_requests: usize,
    dry_run: bool,
}

/// Run a full collect cycle against the configured repository.
///
/// # Errors
///
/// Returns an error when settings cannot be resolved, when any fetch
/// stage fails, or when the store cannot be written.
pub fn run_collect(args: &CollectArgs) -> Result<()> {
    let user = settings::load_user_config()?;
    let resolved = Settings::resolve(&args.overrides(), &user)?;

    if !args.json {
        println!("Fetching traffic for {}...", resolved.repo.full_name());
    }

    let client = GithubClient::new(
        resolved.api_url.clone(),
        resolved.repo.full_name(),
        resolved.token.clone(),
    );

    let mut traffic = store::load_or_default(&resolved.store_path);
    let fetched = pipeline::fetch_all(&client).with_context(|| {
        format!("failed to collect traffic for {}", resolved.repo.full_name())
    })?;
    let window = RunWindow::current(resolved.date_floor.clone());
    let outcome = pipeline::apply(&mut traffic, &fetched, &window);

    if args.dry_run {
        tracing::debug!("dry run, skipping store write");
    } else {
        store::save(&mut traffic, &resolved.store_path)?;
    }

    let report = CollectReport {
        repo: resolved.repo.full_name(),
        store_path: resolved.store_path.display().to_string(),
        date_floor: resolved.date_floor,
        views: outcome.views,
        clones: outcome.clones,
        stars: outcome.stars,
        forks: outcome.forks,
        referrers: outcome.referrers,
        pruned: outcome.pruned,
        api_requests: client.request_count(),
        dry_run: args.dry_run,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &CollectReport) {
    if report.dry_run {
        println!("Dry run: store not written.");
    } else {
        println!("Traffic data updated successfully.");
    }
    println!("  views:        {}", report.views);
    println!("  clones:       {}", report.clones);
    println!("  stars:        {}", report.stars);
    println!("  forks:        {}", report.forks);
    println!("  referrers:    {}", report.referrers);
    println!("  pruned:       {}", report.pruned);
    if let Some(floor) = &report.date_floor {
        println!("  date floor:   {floor}");
    }
    println!("  API requests: {}", report.api_requests);
    println!("  store:        {}", report.store_path);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
