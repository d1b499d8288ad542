use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Traversal policy for one root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
  /// Descend into subdirectories of the work root.
  pub recursive: bool,
  /// Descend into hidden directories of the library root.
  pub enable_hidden: bool,
}

/// What went wrong with a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
  /// A directory could not be listed.
  Walk,
  /// A manifest could not be read.
  Read,
  /// A manifest could not be parsed.
  Parse,
}

/// A file or directory skipped because of an error. Scanning continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
  pub path: PathBuf,
  pub kind: FailureKind,
  pub message: String,
}

/// Result of scanning one root.
#[derive(Debug, Default)]
pub struct ScanSummary {
  /// Manifest files found, whether or not they loaded.
  pub discovered: usize,
  pub failures: Vec<ScanFailure>,
}

/// Errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
  #[error("failed to read root directory {path}: {source}")]
  ReadRoot {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}
