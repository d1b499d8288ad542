//! Run configuration.
//!
//! A [`Config`] is assembled from the environment first and then overlaid
//! with command-line flags by the CLI; flags that were not given leave the
//! environment value in place.

use std::env;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::consts::{
  DEFAULT_WORK_PATH, ENV_ADD_ALL, ENV_DEBUG, ENV_DRY_RUN, ENV_HIDDEN, ENV_LIBRARY_PATH, ENV_RECURSIVE, ENV_VERBOSE,
  ENV_WORK_PATH,
};
use crate::synth::ExpansionPolicy;

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Root of the known universe of modules. Required.
  pub library_path: Option<PathBuf>,
  /// Root of the active set, the manifests that may be rewritten.
  pub work_path: PathBuf,
  /// Descend into subdirectories of the work root.
  pub recursive: bool,
  /// Descend into hidden directories of the library root.
  pub enable_hidden: bool,
  pub debug: bool,
  /// Include library-only manifests in the report.
  pub verbose: bool,
  /// Compute and report changes without writing.
  pub dry_run: bool,
  /// Replace every known module, not only required ones.
  pub add_all: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      library_path: None,
      work_path: PathBuf::from(DEFAULT_WORK_PATH),
      recursive: false,
      enable_hidden: false,
      debug: false,
      verbose: false,
      dry_run: false,
      add_all: false,
    }
  }
}

/// An environment variable holding something other than a boolean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVar {
  pub name: &'static str,
  pub value: String,
}

impl fmt::Display for InvalidVar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}={:?} is not a boolean", self.name, self.value)
  }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// One or more boolean variables could not be parsed.
  #[error("invalid environment configuration: {}", join_invalid(.0))]
  InvalidEnv(Vec<InvalidVar>),
}

fn join_invalid(vars: &[InvalidVar]) -> String {
  vars.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

impl Config {
  /// Build a configuration from defaults and the environment.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut config = Self::default();
    config.load_from_env()?;
    Ok(config)
  }

  /// Overlay values present in the environment onto `self`.
  ///
  /// Unset and empty variables leave the current value alone. Every malformed
  /// boolean is reported, not just the first one.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::InvalidEnv`] listing each variable whose value is
  /// not a boolean. Valid variables are still applied.
  pub fn load_from_env(&mut self) -> Result<(), ConfigError> {
    if let Some(path) = env::var_os(ENV_LIBRARY_PATH).filter(|value| !value.is_empty()) {
      self.library_path = Some(PathBuf::from(path));
    }
    if let Some(path) = env::var_os(ENV_WORK_PATH).filter(|value| !value.is_empty()) {
      self.work_path = PathBuf::from(path);
    }

    let flags = [
      (ENV_RECURSIVE, &mut self.recursive),
      (ENV_HIDDEN, &mut self.enable_hidden),
      (ENV_DEBUG, &mut self.debug),
      (ENV_VERBOSE, &mut self.verbose),
      (ENV_DRY_RUN, &mut self.dry_run),
      (ENV_ADD_ALL, &mut self.add_all),
    ];

    let mut invalid = Vec::new();
    for (name, slot) in flags {
      let Some(value) = env::var_os(name).filter(|value| !value.is_empty()) else {
        continue;
      };
      let value = value.to_string_lossy().into_owned();
      match parse_bool(&value) {
        Some(parsed) => *slot = parsed,
        None => invalid.push(InvalidVar { name, value }),
      }
    }

    if invalid.is_empty() {
      Ok(())
    } else {
      Err(ConfigError::InvalidEnv(invalid))
    }
  }

  pub fn expansion_policy(&self) -> ExpansionPolicy {
    if self.add_all {
      ExpansionPolicy::AddAll
    } else {
      ExpansionPolicy::RequiredOnly
    }
  }
}

/// Parse a boolean the way shell configuration usually spells it.
pub fn parse_bool(value: &str) -> Option<bool> {
  match value {
    "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
    "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
    _ => None,
  }
}
