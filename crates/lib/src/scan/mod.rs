//! Directory traversal that discovers module files.
//!
//! Two roots are scanned per run, the library root first and the work root
//! second, into one [`Registry`]. The policy differs by root:
//!
//! - Work root: only the root directory itself unless `recursive` is set.
//! - Library root: everything, except hidden directories (unless
//!   `enable_hidden`) and the `pkg` and `bin` directories directly below the
//!   root.
//!
//! Entries are visited depth-first, sorted by file name. Errors on single
//! entries are collected into the [`ScanSummary`] and never stop the walk.

mod types;

pub use types::*;

use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::consts::{LIBRARY_SKIP_DIRS, MANIFEST_SUFFIX};
use crate::registry::{ManifestRecord, Registry};

/// Scan `root` and insert every manifest found into `registry`.
///
/// `active` marks the root as the work root: its records become the active
/// set and directory descent follows `options.recursive`.
///
/// # Errors
///
/// Returns [`ScanError::ReadRoot`] if `root` itself cannot be listed. Any
/// other failure is recorded in the returned summary.
pub fn scan_root(
  root: &Path,
  active: bool,
  options: &ScanOptions,
  registry: &mut Registry,
) -> Result<ScanSummary, ScanError> {
  fs::read_dir(root).map_err(|source| ScanError::ReadRoot {
    path: root.to_path_buf(),
    source,
  })?;

  debug!(root = %root.display(), active, "scanning");

  let mut summary = ScanSummary::default();
  let walker = WalkDir::new(root)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| keep_entry(entry, active, options));

  for entry in walker {
    let entry = match entry {
      Ok(entry) => entry,
      Err(err) => {
        let path = err.path().unwrap_or(root).to_path_buf();
        warn!(path = %path.display(), error = %err, "failed to read directory entry");
        summary.failures.push(ScanFailure {
          path,
          kind: FailureKind::Walk,
          message: err.to_string(),
        });
        continue;
      }
    };

    if entry.file_type().is_dir() || !is_manifest(&entry) {
      continue;
    }

    summary.discovered += 1;
    let path = entry.into_path();

    let bytes = match fs::read(&path) {
      Ok(bytes) => bytes,
      Err(err) => {
        warn!(path = %path.display(), error = %err, "failed to read manifest");
        summary.failures.push(ScanFailure {
          path,
          kind: FailureKind::Read,
          message: format!("failed to read manifest: {}", err),
        });
        continue;
      }
    };

    match ManifestRecord::from_bytes(path.clone(), bytes, active) {
      Ok(record) => {
        debug!(path = %path.display(), module = %record.identity, "found manifest");
        registry.insert(record);
      }
      Err(err) => {
        warn!(path = %path.display(), error = %err, "failed to parse manifest");
        summary.failures.push(ScanFailure {
          path,
          kind: FailureKind::Parse,
          message: format!("failed to parse manifest: {}", err),
        });
      }
    }
  }

  Ok(summary)
}

fn is_manifest(entry: &DirEntry) -> bool {
  entry
    .file_name()
    .to_str()
    .is_some_and(|name| name.ends_with(MANIFEST_SUFFIX))
}

/// Decide whether the walk enters `entry`. Files are always kept.
fn keep_entry(entry: &DirEntry, active: bool, options: &ScanOptions) -> bool {
  if entry.depth() == 0 || !entry.file_type().is_dir() {
    return true;
  }

  if active {
    return options.recursive;
  }

  let name = entry.file_name().to_string_lossy();
  if name.starts_with('.') && !options.enable_hidden {
    debug!(path = %entry.path().display(), "skipping hidden directory");
    return false;
  }
  if entry.depth() == 1 && LIBRARY_SKIP_DIRS.contains(&name.as_ref()) {
    debug!(path = %entry.path().display(), "skipping build directory");
    return false;
  }
  true
}
