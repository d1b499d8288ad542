//! Replace-directive synthesis.
//!
//! For one active manifest (the subject) the synthesizer walks the
//! dependency graph through the registry and emits one [`Override`] per
//! reachable module, pointing at that module's directory relative to the
//! subject's directory.
//!
//! # Algorithm
//!
//! `visit(frontier, allow_recursion)` starts at `visit(subject, true)`:
//!
//! 1. Unless the frontier is the subject, add an override for it (once per
//!    identity).
//! 2. Without recursion, stop.
//! 3. [`ExpansionPolicy::AddAll`]: visit every known module without
//!    recursion.
//! 4. [`ExpansionPolicy::RequiredOnly`]: visit each required module that
//!    the registry knows, with recursion. Each frontier is descended into at
//!    most once per subject, so cyclic graphs terminate.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::registry::{ManifestRecord, Registry};
use crate::util::path::{relative_path, to_slash};

/// Which modules a subject receives overrides for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionPolicy {
  /// The transitive closure of required modules present in the registry.
  #[default]
  RequiredOnly,
  /// Every module in the registry.
  AddAll,
}

/// One synthesized `replace module => target` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Override {
  pub module: String,
  /// Relative, `/`-separated directory path.
  pub target: String,
}

#[derive(Debug, Error)]
pub enum SynthError {
  #[error("cannot compute a relative path from {from} to {to}")]
  RelativePath { from: PathBuf, to: PathBuf },

  #[error("relative path {path} is not valid UTF-8")]
  NonUtf8Path { path: PathBuf },
}

/// Everything found for one subject.
///
/// Errors do not stop the walk; the caller decides what a non-empty
/// `errors` means for the manifest.
#[derive(Debug, Default)]
pub struct Synthesis {
  /// Sorted by module.
  pub overrides: Vec<Override>,
  pub errors: Vec<SynthError>,
}

/// Per-subject walk state.
struct Walk<'r> {
  subject: &'r ManifestRecord,
  added: BTreeMap<String, String>,
  visited: HashSet<String>,
  errors: Vec<SynthError>,
}

pub struct Synthesizer<'a> {
  registry: &'a Registry,
  policy: ExpansionPolicy,
}

impl<'a> Synthesizer<'a> {
  pub fn new(registry: &'a Registry, policy: ExpansionPolicy) -> Self {
    Self { registry, policy }
  }

  /// Compute the overrides for `subject`.
  pub fn synthesize(&self, subject: &ManifestRecord) -> Synthesis {
    let mut walk = Walk {
      subject,
      added: BTreeMap::new(),
      visited: HashSet::new(),
      errors: Vec::new(),
    };
    self.visit(&mut walk, subject, true);

    Synthesis {
      overrides: walk
        .added
        .into_iter()
        .map(|(module, target)| Override { module, target })
        .collect(),
      errors: walk.errors,
    }
  }

  fn visit(&self, walk: &mut Walk<'_>, frontier: &ManifestRecord, allow_recursion: bool) {
    let subject_record = walk.subject;
    let subject = subject_record.identity.as_str();

    if frontier.identity == subject {
      debug!(subject, "not adding self");
    } else if walk.added.contains_key(&frontier.identity) {
      debug!(subject, module = %frontier.identity, "already added");
    } else {
      match relative_target(subject_record, frontier) {
        Ok(target) => {
          debug!(subject, module = %frontier.identity, %target, "added");
          walk.added.insert(frontier.identity.clone(), target);
        }
        Err(err) => walk.errors.push(err),
      }
    }

    if !allow_recursion {
      return;
    }
    if !walk.visited.insert(frontier.identity.clone()) {
      debug!(subject, module = %frontier.identity, "already visited");
      return;
    }

    match self.policy {
      ExpansionPolicy::AddAll => {
        debug!(subject, "adding all known modules");
        for record in self.registry.known() {
          self.visit(walk, record, false);
        }
      }
      ExpansionPolicy::RequiredOnly => {
        for require in &frontier.requires {
          match self.registry.get(&require.path) {
            Some(child) => {
              debug!(subject, from = %frontier.identity, module = %require.path, "required module found");
              self.visit(walk, child, true);
            }
            None => {
              debug!(subject, from = %frontier.identity, module = %require.path, "required module not found");
            }
          }
        }
      }
    }
  }
}

/// Directory of `to` relative to the directory of `from`, written the way a
/// local replace target must be: `/` separators, and a leading `./` unless
/// the path already climbs with `..`.
pub fn relative_target(from: &ManifestRecord, to: &ManifestRecord) -> Result<String, SynthError> {
  let relative = relative_path(from.dir(), to.dir()).ok_or_else(|| SynthError::RelativePath {
    from: from.dir().to_path_buf(),
    to: to.dir().to_path_buf(),
  })?;
  let slashed = to_slash(&relative).ok_or(SynthError::NonUtf8Path { path: relative })?;

  if slashed == "." || slashed == ".." || slashed.starts_with("../") {
    Ok(slashed)
  } else {
    Ok(format!("./{}", slashed))
  }
}
