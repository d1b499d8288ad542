//! End-to-end runs of the binary.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn rewrites_work_manifest() {
  let env = TestEnv::new();
  env.module("a", "example.com/a", &[]);
  let b = env.module("b", "example.com/b", &["example.com/a"]);

  env
    .modfix_cmd("b")
    .assert()
    .success()
    .stdout(predicate::str::contains("rewritten"))
    .stdout(predicate::str::contains("example.com/a → ../a"))
    .stdout(predicate::str::contains("Verdict: success"));

  assert!(env.read(&b).contains("replace example.com/a => ../a"));
}

#[test]
fn second_run_reports_unchanged() {
  let env = TestEnv::new();
  env.module("a", "example.com/a", &[]);
  env.module("b", "example.com/b", &["example.com/a"]);

  env.modfix_cmd("b").assert().success();
  env
    .modfix_cmd("b")
    .assert()
    .success()
    .stdout(predicate::str::contains("unchanged"));
}

#[test]
fn dry_run_does_not_write() {
  let env = TestEnv::new();
  env.module("a", "example.com/a", &[]);
  let b = env.module("b", "example.com/b", &["example.com/a"]);
  let before = env.read(&b);

  env
    .modfix_cmd("b")
    .arg("--dry-run")
    .assert()
    .success()
    .stdout(predicate::str::contains("would rewrite (dry run)"));

  assert_eq!(env.read(&b), before);
}

#[test]
fn dry_run_from_environment() {
  let env = TestEnv::new();
  env.module("a", "example.com/a", &[]);
  let b = env.module("b", "example.com/b", &["example.com/a"]);
  let before = env.read(&b);

  env.modfix_cmd("b").env("MODFIX_DRYRUN", "true").assert().success();

  assert_eq!(env.read(&b), before);
}

#[test]
fn flag_overrides_environment() {
  let env = TestEnv::new();
  env.module("a", "example.com/a", &[]);
  let b = env.module("b", "example.com/b", &["example.com/a"]);

  env
    .modfix_cmd("b")
    .env("MODFIX_DRYRUN", "true")
    .arg("--dry-run=false")
    .assert()
    .success();

  assert!(env.read(&b).contains("replace example.com/a => ../a"));
}

#[test]
fn add_all_and_recursive() {
  let env = TestEnv::new();
  let x = env.module("work/x", "example.com/x", &[]);
  env.module("work/y", "example.com/y", &[]);
  env.module("z", "example.com/z", &[]);

  env.modfix_cmd("work").arg("-r").arg("--add-all").assert().success();

  let text = env.read(&x);
  assert!(text.contains("example.com/y => ../y"), "{}", text);
  assert!(text.contains("example.com/z => ../../z"), "{}", text);
}

#[test]
fn all_manifests_failing_exits_non_zero() {
  let env = TestEnv::new();
  let broken = env.src("broken").join("go.mod");
  std::fs::create_dir_all(broken.parent().unwrap()).unwrap();
  std::fs::write(&broken, "not a module file\n").unwrap();

  env
    .modfix_cmd("broken")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Verdict: fail"));
}

#[test]
fn partial_failure_exits_zero() {
  let env = TestEnv::new();
  env.module("work/ok", "example.com/ok", &[]);
  let broken = env.src("work/broken").join("go.mod");
  std::fs::create_dir_all(broken.parent().unwrap()).unwrap();
  std::fs::write(&broken, "module\n").unwrap();

  env
    .modfix_cmd("work")
    .arg("--recursive")
    .assert()
    .success()
    .stderr(predicate::str::contains("Verdict: partial"));
}

#[test]
fn debug_logs_traversal() {
  let env = TestEnv::new();
  env.module("a", "example.com/a", &[]);
  env.module("b", "example.com/b", &["example.com/a", "ext/foo"]);

  env
    .modfix_cmd("b")
    .arg("--debug")
    .assert()
    .success()
    .stderr(predicate::str::contains("required module not found"));
}
