//! Properties every run must hold, checked on a layout with shared and
//! cyclic dependencies.

use std::collections::BTreeSet;
use std::path::PathBuf;

use modfix_lib::config::Config;
use modfix_lib::report::{OutcomeState, Verdict};

use super::common::{Workspace, outcome, read, run};

/// `work/{app,svc}` are active; `a`, `b`, `c` live in the library, with a
/// cycle between `b` and `c`.
fn layout(ws: &Workspace) -> Vec<PathBuf> {
  ws.module("a", "example.com/a", &[]);
  ws.module("b", "example.com/b", &["example.com/c", "example.com/a"]);
  ws.module("c", "example.com/c", &["example.com/b"]);
  vec![
    ws.module("work/app", "example.com/app", &["example.com/b", "example.com/svc", "ext/foo"]),
    ws.module("work/svc", "example.com/svc", &["example.com/app", "example.com/svc"]),
  ]
}

fn recursive(ws: &Workspace) -> Config {
  Config {
    recursive: true,
    ..ws.config("work")
  }
}

#[test]
fn cycles_terminate_with_full_closure() {
  let ws = Workspace::new();
  layout(&ws);

  let report = run(&recursive(&ws));

  assert_eq!(report.verdict, Verdict::Success);
  let modules: Vec<&str> = outcome(&report, "example.com/app")
    .overrides
    .iter()
    .map(|o| o.module.as_str())
    .collect();
  assert_eq!(
    modules,
    vec!["example.com/a", "example.com/b", "example.com/c", "example.com/svc"]
  );
}

#[test]
fn never_overrides_self_or_unknown_modules() {
  let ws = Workspace::new();
  layout(&ws);

  let report = run(&recursive(&ws));

  let known: BTreeSet<&str> = [
    "example.com/a",
    "example.com/b",
    "example.com/c",
    "example.com/app",
    "example.com/svc",
  ]
  .into_iter()
  .collect();
  for outcome in &report.work {
    let module = outcome.module.as_deref().unwrap();
    for entry in &outcome.overrides {
      assert_ne!(entry.module, module);
      assert!(known.contains(entry.module.as_str()), "unknown {}", entry.module);
    }
  }
}

#[test]
fn second_run_is_unchanged() {
  let ws = Workspace::new();
  layout(&ws);
  let config = recursive(&ws);

  let first = run(&config);
  assert!(first.work.iter().all(|o| o.state == OutcomeState::Changed { written: true }));

  let second = run(&config);
  assert!(second.work.iter().all(|o| o.state == OutcomeState::Unchanged));
}

#[test]
fn identical_inputs_produce_identical_bytes() {
  let left = Workspace::new();
  let right = Workspace::new();
  let left_files = layout(&left);
  let right_files = layout(&right);

  run(&recursive(&left));
  run(&recursive(&right));

  for (l, r) in left_files.iter().zip(&right_files) {
    assert_eq!(read(l), read(r));
  }
}

#[test]
fn dry_run_reports_without_writing() {
  let ws = Workspace::new();
  let files = layout(&ws);
  let before: Vec<String> = files.iter().map(|path| read(path)).collect();

  let config = Config {
    dry_run: true,
    ..recursive(&ws)
  };
  let report = run(&config);

  assert!(report.work.iter().all(|o| o.state == OutcomeState::Changed { written: false }));
  let after: Vec<String> = files.iter().map(|path| read(path)).collect();
  assert_eq!(before, after);
}
