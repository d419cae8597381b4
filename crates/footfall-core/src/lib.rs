//! footfall-core: data model, merge logic, and persistence for the
//! traffic store.
//!
//! The store is a single JSON document of five time series (daily
//! views and clones, daily star/fork/referrer snapshots) keyed by
//! ISO-8601 string timestamps. One run of the pipeline is
//! load → fetch → merge → snapshot → prune → write; this crate owns
//! everything except the fetch itself, which sits behind the
//! [`source::TrafficSource`] trait so the CLI can plug in HTTP and
//! tests can plug in canned data.
//!
//! # Module map
//!
//! - [`model`] — the persisted document and its entry types.
//! - [`day`] — day-string helpers (the only place `chrono` is used).
//! - [`merge`] — daily-series merge and same-day snapshot recording.
//! - [`retention`] — the rolling 365-day pruner.
//! - [`store`] — load / tolerant-load / save of the JSON file.
//! - [`source`] — the fetch seam and its error type.
//! - [`pipeline`] — fetch orchestration and the apply step.

pub mod day;
pub mod merge;
pub mod model;
pub mod pipeline;
pub mod retention;
pub mod source;
pub mod store;
