//! Change detection and conditional writes.
//!
//! The working copy of an active manifest has every existing replace
//! directive removed, receives the synthesized overrides, and is rendered
//! canonically. The rendering is compared with the bytes read during the
//! scan; only a difference leads to a write, and only outside dry runs.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::cancel::CancelFlag;
use crate::manifest::ManifestError;
use crate::registry::ManifestRecord;
use crate::report::OutcomeState;
use crate::synth::Override;

#[derive(Debug, Error)]
pub enum FinalizeError {
  #[error("failed to update {path}: {source}")]
  Manifest {
    path: PathBuf,
    #[source]
    source: ManifestError,
  },

  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("cancelled before writing {path}")]
  Cancelled { path: PathBuf },
}

/// Render `record` with exactly `overrides` as its replace directives.
///
/// # Errors
///
/// Returns [`ManifestError`] if an override is rejected or the rendered
/// document does not parse back.
pub fn render(record: &ManifestRecord, overrides: &[Override]) -> Result<Vec<u8>, ManifestError> {
  let mut document = record.document.clone();
  let dropped = document.drop_all_replaces();
  debug!(path = %record.path.display(), dropped, "dropped existing replace directives");

  for entry in overrides {
    document.add_replace(&entry.module, None, &entry.target, None)?;
  }
  document.sort_replaces();
  document.format()
}

/// Render, compare and, when the bytes changed and this is not a dry run,
/// write `record` back to disk.
pub fn finalize(record: &ManifestRecord, overrides: &[Override], dry_run: bool, cancel: &CancelFlag) -> OutcomeState {
  match try_finalize(record, overrides, dry_run, cancel) {
    Ok(state) => state,
    Err(err) => OutcomeState::failed(err),
  }
}

fn try_finalize(
  record: &ManifestRecord,
  overrides: &[Override],
  dry_run: bool,
  cancel: &CancelFlag,
) -> Result<OutcomeState, FinalizeError> {
  let rendered = render(record, overrides).map_err(|source| FinalizeError::Manifest {
    path: record.path.clone(),
    source,
  })?;

  if rendered == record.origin {
    debug!(path = %record.path.display(), "unchanged");
    return Ok(OutcomeState::Unchanged);
  }

  if dry_run {
    info!(path = %record.path.display(), "would rewrite (dry run)");
    return Ok(OutcomeState::Changed { written: false });
  }

  if cancel.is_cancelled() {
    return Err(FinalizeError::Cancelled {
      path: record.path.clone(),
    });
  }

  fs::write(&record.path, &rendered).map_err(|source| FinalizeError::Write {
    path: record.path.clone(),
    source,
  })?;
  info!(path = %record.path.display(), "rewrote");

  Ok(OutcomeState::Changed { written: true })
}
