//! Implementation of a `modfix` run.
//!
//! Executes the pipeline and prints the report, either as sectioned text
//! or as JSON.

use std::process::ExitCode;

use anyhow::{Context, Result};

use modfix_lib::cancel::CancelFlag;
use modfix_lib::config::Config;
use modfix_lib::execute::execute;
use modfix_lib::report::{Outcome, OutcomeState, Report, Verdict};

use crate::output::{
  OutputFormat, print_error, print_heading, print_json, print_stat, print_success, print_warning, state_label,
  state_symbol, symbols, verdict_label,
};

pub fn cmd_fix(config: &Config, cancel: &CancelFlag, format: OutputFormat) -> Result<ExitCode> {
  let report = execute(config, cancel).context("Failed to fix module files")?;

  if format.is_json() {
    print_json(&report)?;
  } else {
    print_report(&report);
  }

  if report.is_failure() {
    Ok(ExitCode::FAILURE)
  } else {
    Ok(ExitCode::SUCCESS)
  }
}

fn print_report(report: &Report) {
  for failure in &report.scan_failures {
    print_warning(&format!("skipped {}: {}", failure.path.display(), failure.message));
  }
  for collision in &report.collisions {
    print_warning(&format!(
      "module {} is declared by {} and {}, using {}",
      collision.module,
      collision.shadowed.display(),
      collision.kept.display(),
      collision.kept.display()
    ));
  }

  if let Some(library) = &report.library {
    print_heading("Library");
    for outcome in library {
      print_outcome(outcome);
    }
    println!();
  }

  print_heading("Work");
  for outcome in &report.work {
    print_outcome(outcome);
  }
  println!();

  print_stat("Manifests", &report.work.len().to_string());
  print_stat("Rewritten", &report.written_count().to_string());
  print_stat("Failed", &report.failed_count().to_string());

  if report.cancelled {
    print_error("Cancelled before all manifests were written");
  }

  let verdict = format!("Verdict: {}", verdict_label(report.verdict));
  match report.verdict {
    Verdict::Success => print_success(&verdict),
    Verdict::Partial => print_warning(&verdict),
    Verdict::Fail => print_error(&verdict),
  }
}

fn print_outcome(outcome: &Outcome) {
  let module = outcome.module.as_deref().unwrap_or("?");
  println!(
    "  {} {} ({}) {}",
    state_symbol(&outcome.state),
    outcome.path.display(),
    module,
    state_label(&outcome.state)
  );

  for entry in &outcome.overrides {
    println!("      {} {} {}", entry.module, symbols::ARROW, entry.target);
  }

  if let OutcomeState::Failed { error } = &outcome.state {
    println!("      {}", error);
  }
}
