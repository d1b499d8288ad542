//! One run, end to end.
//!
//! Scan the library root, then the work root, into a single registry;
//! synthesize overrides for every active manifest; finalize each one; and
//! fold the outcomes into a [`Report`].

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::cancel::CancelFlag;
use crate::config::Config;
use crate::finalize::finalize;
use crate::registry::Registry;
use crate::report::{Outcome, OutcomeState, Report, Verdict};
use crate::scan::{FailureKind, ScanError, ScanFailure, ScanOptions, scan_root};
use crate::synth::Synthesizer;

/// Errors that stop a run before any manifest is evaluated.
#[derive(Debug, Error)]
pub enum ModfixError {
  #[error("library path is required (set GOPATH or pass --go-path)")]
  MissingLibraryPath,

  #[error("failed to resolve {path}: {source}")]
  ResolvePath {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error(transparent)]
  Scan(#[from] ScanError),

  #[error("no mod files found in work path {path}")]
  NoActiveManifests { path: PathBuf },
}

/// Run the whole pipeline described by `config`.
///
/// Per-manifest problems end up in the report; only problems that make the
/// run meaningless are returned as errors.
///
/// # Errors
///
/// Returns [`ModfixError`] if the library path is missing, a root cannot be
/// resolved or listed, or the work root holds no module files.
pub fn execute(config: &Config, cancel: &CancelFlag) -> Result<Report, ModfixError> {
  let library_path = config
    .library_path
    .as_deref()
    .filter(|path| !path.as_os_str().is_empty())
    .ok_or(ModfixError::MissingLibraryPath)?;

  let library_root = resolve(library_path)?;
  let work_root = resolve(&config.work_path)?;
  debug!(library = %library_root.display(), work = %work_root.display(), "resolved roots");

  let options = ScanOptions {
    recursive: config.recursive,
    enable_hidden: config.enable_hidden,
  };

  let mut registry = Registry::new();
  let library_scan = scan_root(&library_root, false, &options, &mut registry)?;
  let work_scan = scan_root(&work_root, true, &options, &mut registry)?;

  if work_scan.discovered == 0 {
    return Err(ModfixError::NoActiveManifests { path: work_root });
  }

  info!(
    known = registry.known_len(),
    active = registry.active_len(),
    "scan complete"
  );

  let synthesizer = Synthesizer::new(&registry, config.expansion_policy());
  let mut work = Vec::new();

  for record in registry.active() {
    let synthesis = synthesizer.synthesize(record);

    let state = if cancel.is_cancelled() {
      OutcomeState::failed("cancelled")
    } else if !synthesis.errors.is_empty() {
      let messages: Vec<String> = synthesis.errors.iter().map(ToString::to_string).collect();
      OutcomeState::Failed {
        error: messages.join("; "),
      }
    } else {
      finalize(record, &synthesis.overrides, config.dry_run, cancel)
    };

    work.push(Outcome {
      path: record.path.clone(),
      module: Some(record.identity.clone()),
      overrides: synthesis.overrides,
      state,
    });
  }

  let mut scan_failures = library_scan.failures;
  for failure in work_scan.failures {
    if matches!(failure.kind, FailureKind::Read | FailureKind::Parse) {
      work.push(unparsed_outcome(&failure));
    }
    if !scan_failures.iter().any(|known| known.path == failure.path) {
      scan_failures.push(failure);
    }
  }

  let library = config.verbose.then(|| {
    registry
      .known()
      .filter(|record| !record.active)
      .map(|record| Outcome {
        path: record.path.clone(),
        module: Some(record.identity.clone()),
        overrides: Vec::new(),
        state: OutcomeState::NotEvaluated,
      })
      .collect()
  });

  Ok(Report {
    verdict: Verdict::from_outcomes(&work),
    work,
    library,
    scan_failures,
    collisions: registry.collisions().to_vec(),
    cancelled: cancel.is_cancelled(),
  })
}

fn resolve(path: &Path) -> Result<PathBuf, ModfixError> {
  dunce::canonicalize(path).map_err(|source| ModfixError::ResolvePath {
    path: path.to_path_buf(),
    source,
  })
}

fn unparsed_outcome(failure: &ScanFailure) -> Outcome {
  Outcome {
    path: failure.path.clone(),
    module: None,
    overrides: Vec::new(),
    state: OutcomeState::Failed {
      error: failure.message.clone(),
    },
  }
}
