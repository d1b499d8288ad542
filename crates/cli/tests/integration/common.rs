//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
  "GOPATH",
  "WORKPATH",
  "MODFIX_RECURSIVE",
  "MODFIX_HIDDEN",
  "MODFIX_DEBUG",
  "MODFIX_VERBOSE",
  "MODFIX_DRYRUN",
  "MODFIX_ADD_ALL",
  "RUST_LOG",
];

/// Isolated test environment.
///
/// Each test gets its own library root at `<tmp>/go` with module sources
/// under `<tmp>/go/src`.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("go/src")).unwrap();
    Self { temp }
  }

  /// Library root (canonical).
  pub fn go_path(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path().join("go")).unwrap()
  }

  /// Directory below `<go>/src`.
  pub fn src(&self, relative_path: &str) -> PathBuf {
    self.go_path().join("src").join(relative_path)
  }

  /// Write `<go>/src/<dir>/go.mod` declaring `module` with the given requires.
  pub fn module(&self, dir: &str, module: &str, requires: &[&str]) -> PathBuf {
    let mut content = format!("module {}\n\ngo 1.22\n", module);
    for require in requires {
      content.push_str(&format!("\nrequire {} v1.0.0\n", require));
    }
    let path = self.src(dir).join("go.mod");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    path
  }

  pub fn read(&self, path: &PathBuf) -> String {
    std::fs::read_to_string(path).unwrap()
  }

  /// A modfix command with a clean environment, pointed at this library
  /// root and the work root `<go>/src/<work>`.
  pub fn modfix_cmd(&self, work: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("modfix");
    for var in ENV_VARS {
      cmd.env_remove(var);
    }
    cmd.arg("--go-path").arg(self.go_path());
    cmd.arg("--work-path").arg(self.src(work));
    cmd
  }
}
