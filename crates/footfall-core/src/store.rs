//! Store persistence: explicit load, tolerant load, and save.
//!
//! The store is one JSON file (`traffic_data.json` by default).
//! [`load`] surfaces every failure as a [`StoreError`];
//! [`load_or_default`] is the deliberately tolerant path the collect
//! pipeline uses, where a missing or unreadable file means "start a
//! fresh history" rather than "abort"; it logs what it swallowed so
//! an unexpectedly reset history is traceable. Saving stamps
//! `updated_at`, serializes pretty, writes a sibling `.tmp` file, and
//! renames it over the target so an interrupted write never leaves a
//! half-written store at the real path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::day::updated_at_stamp;
use crate::model::TrafficStore;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from store file I/O and (de)serialization.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store file could not be read.
    #[error("failed to read store file {path}: {source}")]
    Read {
        /// Store file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The store file exists but is not a valid store document.
    #[error("store file {path} is not valid JSON: {source}")]
    Parse {
        /// Store file path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The in-memory store could not be serialized.
    #[error("failed to serialize store: {0}")]
    Serialize(serde_json::Error),

    /// The store file (or its temp sibling) could not be written.
    #[error("failed to write store file {path}: {source}")]
    Write {
        /// Path that failed to write or rename.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Read and parse the store file at `path`.
///
/// # Errors
///
/// Returns [`StoreError::Read`] when the file cannot be read (including
/// when it does not exist) and [`StoreError::Parse`] when it is not a
/// valid store document.
pub fn load(path: &Path) -> Result<TrafficStore, StoreError> {
    let raw = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the store, falling back to an empty one when the file is
/// missing or unreadable. A missing file is the normal first-run case
/// and logs at debug; anything else logs a warning naming the cause,
/// since it means accumulated history is being left behind.
#[must_use]
pub fn load_or_default(path: &Path) -> TrafficStore {
    match load(path) {
        Ok(store) => store,
        Err(StoreError::Read { ref source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no store file yet, starting fresh");
            TrafficStore::default()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), "ignoring unusable store file: {err}");
            TrafficStore::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Stamp `updated_at` and write the store to `path` via a temp-file
/// rename.
///
/// # Errors
///
/// Returns [`StoreError::Serialize`] when the store cannot be encoded
/// and [`StoreError::Write`] when the temp file or the rename fails.
pub fn save(store: &mut TrafficStore, path: &Path) -> Result<(), StoreError> {
    store.updated_at = updated_at_stamp();

    let json = serde_json::to_string_pretty(store).map_err(StoreError::Serialize)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json.as_bytes()).map_err(|source| StoreError::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), entries = store.total_entries(), "store written");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
