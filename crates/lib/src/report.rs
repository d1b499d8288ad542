//! Per-manifest outcomes and the overall verdict of a run.

use std::path::PathBuf;

use serde::Serialize;

use crate::registry::Collision;
use crate::scan::ScanFailure;
use crate::synth::Override;

/// What happened to one manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OutcomeState {
  /// Library-only manifest, listed in verbose reports. Never written.
  NotEvaluated,
  /// The canonical rendering matched the file on disk.
  Unchanged,
  /// The rendering differs. `written` is false in a dry run.
  Changed { written: bool },
  Failed { error: String },
}

impl OutcomeState {
  pub fn is_failed(&self) -> bool {
    matches!(self, Self::Failed { .. })
  }

  pub fn failed(error: impl ToString) -> Self {
    Self::Failed {
      error: error.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
  pub path: PathBuf,
  /// Absent when the file could not be parsed.
  pub module: Option<String>,
  pub overrides: Vec<Override>,
  #[serde(flatten)]
  pub state: OutcomeState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
  /// No manifest failed.
  Success,
  /// Some manifests failed.
  Partial,
  /// Every manifest failed.
  Fail,
}

impl Verdict {
  pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> Self {
    let (total, failed) = outcomes.into_iter().fold((0usize, 0usize), |(total, failed), outcome| {
      (total + 1, failed + usize::from(outcome.state.is_failed()))
    });

    if failed == 0 {
      Verdict::Success
    } else if failed == total {
      Verdict::Fail
    } else {
      Verdict::Partial
    }
  }
}

/// The structured result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
  /// One outcome per work-root manifest.
  pub work: Vec<Outcome>,
  /// Library-only manifests, present in verbose mode.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub library: Option<Vec<Outcome>>,
  pub verdict: Verdict,
  pub scan_failures: Vec<ScanFailure>,
  pub collisions: Vec<Collision>,
  /// A cancellation request stopped the run early.
  pub cancelled: bool,
}

impl Report {
  /// Whether the run should end with a non-zero exit status.
  pub fn is_failure(&self) -> bool {
    self.verdict == Verdict::Fail || self.cancelled
  }

  pub fn failed_count(&self) -> usize {
    self.work.iter().filter(|outcome| outcome.state.is_failed()).count()
  }

  /// Number of manifests written to disk.
  pub fn written_count(&self) -> usize {
    self
      .work
      .iter()
      .filter(|outcome| matches!(outcome.state, OutcomeState::Changed { written: true }))
      .count()
  }
}
