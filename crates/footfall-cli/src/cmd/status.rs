//! `footfall status`: read-only summary of the store file.
//!
//! Never touches the network and never writes. A missing store is a
//! plain error rather than an empty summary, so a misconfigured path
//! is visible instead of looking like a fresh install.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use footfall_core::day::day_of;
use footfall_core::model::{Timestamped, TrafficStore};
use footfall_core::store::{self, StoreError};

use crate::settings;

#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Store file to summarize
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SeriesSummary {
    name: &'static str,
    entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    days_covered: Option<i64>,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    store_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
    total_entries: usize,
    series: Vec<SeriesSummary>,
}

/// Print a summary of the store file.
///
/// # Errors
///
/// Returns an error when the store file is missing or unreadable.
pub fn run_status(args: &StatusArgs) -> Result<()> {
    let user = settings::load_user_config()?;
    let path = settings::resolve_store_path(args.file.clone(), &user);

    let traffic = match store::load(&path) {
        Ok(traffic) => traffic,
        Err(StoreError::Read { ref source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            anyhow::bail!(
                "no store file at {}; run `footfall collect` to create one",
                path.display()
            );
        }
        Err(err) => return Err(err.into()),
    };

    let report = build_report(&path.display().to_string(), &traffic);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn build_report(store_path: &str, traffic: &TrafficStore) -> StatusReport {
    StatusReport {
        store_path: store_path.to_string(),
        updated_at: (!traffic.updated_at.is_empty()).then(|| traffic.updated_at.clone()),
        total_entries: traffic.total_entries(),
        series: vec![
            summarize("views", &traffic.views),
            summarize("clones", &traffic.clones),
            summarize("stars", &traffic.stars),
            summarize("forks", &traffic.forks),
            summarize("referrers", &traffic.referrers),
        ],
    }
}

// Series are kept sorted by the merge pipeline, so first and last
// entries bound the covered span.
fn summarize<T: Timestamped>(name: &'static str, series: &[T]) -> SeriesSummary {
    let first_day = series
        .first()
        .map(|entry| day_of(entry.timestamp()).to_string());
    let last_day = series
        .last()
        .map(|entry| day_of(entry.timestamp()).to_string());
    let days_covered = match (&first_day, &last_day) {
        (Some(first), Some(last)) => span_days(first, last),
        _ => None,
    };

    SeriesSummary {
        name,
        entries: series.len(),
        first_day,
        last_day,
        days_covered,
    }
}

// Inclusive day span; None when a day-string does not parse, which
// only happens for hand-edited files.
fn span_days(first: &str, last: &str) -> Option<i64> {
    let first = chrono::NaiveDate::parse_from_str(first, "%Y-%m-%d").ok()?;
    let last = chrono::NaiveDate::parse_from_str(last, "%Y-%m-%d").ok()?;
    Some((last - first).num_days() + 1)
}

fn span_label(series: &SeriesSummary) -> String {
    match (&series.first_day, &series.last_day) {
        (Some(first), Some(last)) => match series.days_covered {
            Some(1) => format!("({first})"),
            Some(days) => format!("({first} .. {last}, {days} days)"),
            None => format!("({first} .. {last})"),
        },
        _ => "(empty)".to_string(),
    }
}

fn print_report(report: &StatusReport) {
    println!("Store summary for {}", report.store_path);
    match &report.updated_at {
        Some(at) => println!("  {:<13} {at}", "updated:"),
        None => println!("  {:<13} never", "updated:"),
    }
    for series in &report.series {
        println!(
            "  {:<13} {} {}",
            format!("{}:", series.name),
            series.entries,
            span_label(series)
        );
    }
    println!("  {:<13} {}", "total:", report.total_entries);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
