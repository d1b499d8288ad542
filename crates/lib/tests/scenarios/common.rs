//! Shared fixtures for end-to-end tests.

use std::fs;
use std::path::{Path, PathBuf};

use modfix_lib::cancel::CancelFlag;
use modfix_lib::config::Config;
use modfix_lib::execute::execute;
use modfix_lib::report::{Outcome, Report};
use tempfile::TempDir;

/// A library root at `<tmp>/lib` with sources under `<tmp>/lib/src`.
pub struct Workspace {
  _temp: TempDir,
  pub library: PathBuf,
}

impl Workspace {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let library = dunce::canonicalize(temp.path()).unwrap().join("lib");
    fs::create_dir_all(library.join("src")).unwrap();
    Self { _temp: temp, library }
  }

  /// Path of `rel` below `<lib>/src`.
  pub fn src(&self, rel: &str) -> PathBuf {
    self.library.join("src").join(rel)
  }

  /// Write `<lib>/src/<dir>/go.mod` declaring `module` and its requires.
  pub fn module(&self, dir: &str, module: &str, requires: &[&str]) -> PathBuf {
    let mut text = format!("module {}\n\ngo 1.22\n", module);
    if !requires.is_empty() {
      text.push_str("\nrequire (\n");
      for require in requires {
        text.push_str(&format!("\t{} v1.0.0\n", require));
      }
      text.push_str(")\n");
    }
    self.write(dir, &text)
  }

  pub fn write(&self, dir: &str, text: &str) -> PathBuf {
    let path = self.src(dir).join("go.mod");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, text).unwrap();
    path
  }

  pub fn config(&self, work: &str) -> Config {
    Config {
      library_path: Some(self.library.clone()),
      work_path: self.src(work),
      ..Default::default()
    }
  }
}

pub fn run(config: &Config) -> Report {
  execute(config, &CancelFlag::new()).unwrap()
}

pub fn read(path: &Path) -> String {
  fs::read_to_string(path).unwrap()
}

/// `(module, target)` pairs of an outcome.
pub fn overrides(outcome: &Outcome) -> Vec<(&str, &str)> {
  outcome
    .overrides
    .iter()
    .map(|o| (o.module.as_str(), o.target.as_str()))
    .collect()
}

pub fn outcome<'a>(report: &'a Report, module: &str) -> &'a Outcome {
  report
    .work
    .iter()
    .find(|outcome| outcome.module.as_deref() == Some(module))
    .unwrap_or_else(|| panic!("no outcome for {}", module))
}
