//! The set of scanned manifests, keyed by module identity.
//!
//! A [`Registry`] is filled by the scanner and only read afterwards. It holds
//! every known manifest (library and work roots) and remembers which
//! identities belong to the active set, the manifests a run may rewrite.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::manifest::{ManifestError, ModFile, Require};

/// One scanned manifest file.
#[derive(Debug, Clone)]
pub struct ManifestRecord {
  /// Module path declared by the file.
  pub identity: String,
  /// Absolute path of the file.
  pub path: PathBuf,
  pub requires: Vec<Require>,
  /// Parsed document; synthesis works on a clone of it.
  pub document: ModFile,
  /// Bytes as read during the scan, the baseline for change detection.
  pub origin: Vec<u8>,
  /// Whether the file was found under the work root.
  pub active: bool,
}

impl ManifestRecord {
  /// Parse `bytes` read from `path` into a record.
  pub fn from_bytes(path: PathBuf, bytes: Vec<u8>, active: bool) -> Result<Self, ManifestError> {
    let document = ModFile::parse(&bytes)?;
    Ok(Self {
      identity: document.module_path().to_string(),
      requires: document.requires(),
      path,
      document,
      origin: bytes,
      active,
    })
  }

  /// Directory containing the manifest.
  pub fn dir(&self) -> &Path {
    self.path.parent().unwrap_or_else(|| Path::new("/"))
  }
}

/// Two distinct files declaring the same module identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
  pub module: String,
  /// The file the registry kept (scanned last).
  pub kept: PathBuf,
  /// The file it replaced.
  pub shadowed: PathBuf,
}

#[derive(Debug, Default)]
pub struct Registry {
  known: BTreeMap<String, ManifestRecord>,
  active: BTreeSet<String>,
  collisions: Vec<Collision>,
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert a record, replacing any earlier record with the same identity.
  ///
  /// Scanning the same file twice (a work root inside the library root) is
  /// a plain update. Two different files with one identity are a collision:
  /// the later file wins, and the collision is logged and returned. A pair
  /// of files that already collided is recorded once, with `kept` updated
  /// to the current winner.
  pub fn insert(&mut self, record: ManifestRecord) -> Option<Collision> {
    let identity = record.identity.clone();
    let kept = record.path.clone();

    if record.active {
      self.active.insert(identity.clone());
    } else {
      self.active.remove(&identity);
    }

    let previous = self.known.insert(identity.clone(), record)?;
    if previous.path == kept {
      return None;
    }

    if let Some(known) = self.collisions.iter_mut().find(|known| {
      known.module == identity
        && ((known.kept == kept && known.shadowed == previous.path)
          || (known.kept == previous.path && known.shadowed == kept))
    }) {
      debug!(module = %identity, kept = %kept.display(), "collision already recorded");
      known.kept = kept;
      known.shadowed = previous.path;
      return None;
    }

    warn!(
      module = %identity,
      kept = %kept.display(),
      shadowed = %previous.path.display(),
      "module declared by more than one manifest, using the last one scanned"
    );
    let collision = Collision {
      module: identity,
      kept,
      shadowed: previous.path,
    };
    self.collisions.push(collision.clone());
    Some(collision)
  }

  pub fn get(&self, identity: &str) -> Option<&ManifestRecord> {
    self.known.get(identity)
  }

  /// Every known record, ordered by identity.
  pub fn known(&self) -> impl Iterator<Item = &ManifestRecord> {
    self.known.values()
  }

  /// Records of the active set, ordered by identity.
  pub fn active(&self) -> impl Iterator<Item = &ManifestRecord> {
    self.active.iter().filter_map(|identity| self.known.get(identity))
  }

  pub fn is_active(&self, identity: &str) -> bool {
    self.active.contains(identity)
  }

  pub fn known_len(&self) -> usize {
    self.known.len()
  }

  pub fn active_len(&self) -> usize {
    self.active.len()
  }

  pub fn collisions(&self) -> &[Collision] {
    &self.collisions
  }
}
