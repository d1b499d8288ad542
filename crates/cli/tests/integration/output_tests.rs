//! Report formats.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn json_report_is_valid() {
  let env = TestEnv::new();
  env.module("a", "example.com/a", &[]);
  env.module("b", "example.com/b", &["example.com/a"]);

  let output = env.modfix_cmd("b").arg("--output").arg("json").output().unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["verdict"], "success");
  assert_eq!(report["work"][0]["module"], "example.com/b");
  assert_eq!(report["work"][0]["state"], "changed");
  assert_eq!(report["work"][0]["written"], true);
  assert_eq!(report["work"][0]["overrides"][0]["target"], "../a");
  assert!(report.get("library").is_none());
}

#[test]
fn verbose_lists_library_modules() {
  let env = TestEnv::new();
  env.module("a", "example.com/a", &[]);
  env.module("b", "example.com/b", &[]);

  env
    .modfix_cmd("b")
    .arg("-v")
    .assert()
    .success()
    .stdout(predicate::str::contains("Library"))
    .stdout(predicate::str::contains("not evaluated"));
}

#[test]
fn collisions_are_warned() {
  let env = TestEnv::new();
  env.module("a", "example.com/a", &[]);
  env.module("copy/a", "example.com/a", &[]);
  env.module("b", "example.com/b", &["example.com/a"]);

  env
    .modfix_cmd("b")
    .assert()
    .success()
    .stderr(predicate::str::contains("is declared by"));
}
