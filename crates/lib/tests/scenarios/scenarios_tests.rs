//! Whole runs over small library layouts.

use std::fs;

use modfix_lib::config::Config;
use modfix_lib::report::{OutcomeState, Verdict};

use super::common::{Workspace, outcome, overrides, read, run};

mod required_only {
  use super::*;

  #[test]
  fn work_module_gains_override_for_library_dependency() {
    let ws = Workspace::new();
    ws.module("a", "example.com/a", &[]);
    let b = ws.module("b", "example.com/b", &["example.com/a"]);

    let report = run(&ws.config("b"));

    assert_eq!(report.verdict, Verdict::Success);
    assert_eq!(report.work.len(), 1);
    let b_outcome = outcome(&report, "example.com/b");
    assert_eq!(overrides(b_outcome), vec![("example.com/a", "../a")]);
    assert_eq!(b_outcome.state, OutcomeState::Changed { written: true });

    let text = read(&b);
    assert!(text.contains("replace example.com/a => ../a"), "{}", text);
    assert_eq!(text.matches("replace").count(), 1, "{}", text);
  }

  #[test]
  fn external_dependency_is_left_alone() {
    let ws = Workspace::new();
    let c = ws.module("c", "example.com/c", &["ext/foo"]);

    let report = run(&ws.config("c"));

    assert_eq!(report.verdict, Verdict::Success);
    assert!(outcome(&report, "example.com/c").overrides.is_empty());
    assert!(!read(&c).contains("ext/foo =>"));
  }

  #[test]
  fn stale_replace_directives_are_dropped() {
    let ws = Workspace::new();
    ws.module("a", "example.com/a", &[]);
    let b = ws.write(
      "b",
      "module example.com/b\n\nrequire example.com/a v1.0.0\n\nreplace (\n\texample.com/a => ./wrong\n\tgone.example/x => ../x\n)\n",
    );

    run(&ws.config("b"));

    let text = read(&b);
    assert!(text.contains("example.com/a => ../a"), "{}", text);
    assert!(!text.contains("./wrong"), "{}", text);
    assert!(!text.contains("gone.example/x"), "{}", text);
  }

  #[test]
  fn nested_dependency_uses_climbing_path() {
    let ws = Workspace::new();
    ws.module("github.com/org/lib", "github.com/org/lib", &[]);
    let app = ws.module("app", "example.com/app", &["github.com/org/lib"]);

    run(&ws.config("app"));

    assert!(read(&app).contains("replace github.com/org/lib => ../github.com/org/lib"));
  }

  #[test]
  fn work_root_below_work_module_gets_dot_prefix() {
    let ws = Workspace::new();
    ws.module("app/tools", "example.com/app/tools", &[]);
    let app = ws.module("app", "example.com/app", &["example.com/app/tools"]);

    run(&ws.config("app"));

    assert!(read(&app).contains("replace example.com/app/tools => ./tools"));
  }
}

mod add_all {
  use super::*;

  #[test]
  fn every_module_receives_every_other_module() {
    let ws = Workspace::new();
    let x = ws.module("x", "example.com/x", &[]);
    ws.module("y", "example.com/y", &[]);
    ws.module("z", "example.com/z", &[]);

    let config = Config {
      add_all: true,
      recursive: true,
      ..ws.config("")
    };
    let report = run(&config);

    assert_eq!(report.work.len(), 3);
    assert_eq!(
      overrides(outcome(&report, "example.com/x")),
      vec![("example.com/y", "../y"), ("example.com/z", "../z")]
    );
    assert_eq!(
      overrides(outcome(&report, "example.com/y")),
      vec![("example.com/x", "../x"), ("example.com/z", "../z")]
    );
    let text = read(&x);
    assert!(text.contains("example.com/y => ../y"));
    assert!(text.contains("example.com/z => ../z"));
  }

  #[test]
  fn single_work_module_without_requires() {
    let ws = Workspace::new();
    ws.module("x", "example.com/x", &[]);
    ws.module("y", "example.com/y", &[]);
    ws.module("z", "example.com/z", &[]);
    let w = ws.module("w", "example.com/w", &[]);

    let config = Config {
      add_all: true,
      ..ws.config("w")
    };
    let report = run(&config);

    assert_eq!(overrides(outcome(&report, "example.com/w")).len(), 3);
    assert_eq!(read(&w).matches(" => ").count(), 3);
  }
}

mod rerun {
  use super::*;

  #[test]
  fn second_run_is_unchanged_and_leaves_mtime() {
    let ws = Workspace::new();
    ws.module("a", "example.com/a", &[]);
    let b = ws.module("b", "example.com/b", &["example.com/a"]);
    let config = ws.config("b");

    run(&config);
    let before = fs::metadata(&b).unwrap().modified().unwrap();
    let contents = read(&b);

    let report = run(&config);

    assert_eq!(outcome(&report, "example.com/b").state, OutcomeState::Unchanged);
    assert_eq!(fs::metadata(&b).unwrap().modified().unwrap(), before);
    assert_eq!(read(&b), contents);
  }
}

mod collisions {
  use super::*;

  #[test]
  fn work_copy_shadows_library_copy() {
    let ws = Workspace::new();
    ws.module("a", "example.com/a", &[]);
    ws.module("fork/a", "example.com/a", &[]);
    let b = ws.module("fork/b", "example.com/b", &["example.com/a"]);

    let config = Config {
      recursive: true,
      ..ws.config("fork")
    };
    let report = run(&config);

    assert_eq!(report.collisions.len(), 1);
    assert_eq!(report.collisions[0].module, "example.com/a");
    assert!(read(&b).contains("example.com/a => ../a"));
  }
}
