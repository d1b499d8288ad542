//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: colored status
//! messages, Unicode symbols, and labels for manifest outcomes.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use modfix_lib::report::{OutcomeState, Verdict};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
  pub const MODIFY: &str = "~";
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_heading(title: &str) {
  println!("{}", title.if_supports_color(Stream::Stdout, |s| s.bold()));
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Short human description of an outcome.
pub fn state_label(state: &OutcomeState) -> &'static str {
  match state {
    OutcomeState::NotEvaluated => "not evaluated",
    OutcomeState::Unchanged => "unchanged",
    OutcomeState::Changed { written: true } => "rewritten",
    OutcomeState::Changed { written: false } => "would rewrite (dry run)",
    OutcomeState::Failed { .. } => "failed",
  }
}

/// Symbol for an outcome line, colored for stdout.
pub fn state_symbol(state: &OutcomeState) -> String {
  match state {
    OutcomeState::NotEvaluated | OutcomeState::Unchanged => symbols::INFO
      .if_supports_color(Stream::Stdout, |s| s.dimmed())
      .to_string(),
    OutcomeState::Changed { written: true } => symbols::SUCCESS
      .if_supports_color(Stream::Stdout, |s| s.green())
      .to_string(),
    OutcomeState::Changed { written: false } => symbols::MODIFY
      .if_supports_color(Stream::Stdout, |s| s.yellow())
      .to_string(),
    OutcomeState::Failed { .. } => symbols::ERROR
      .if_supports_color(Stream::Stdout, |s| s.red())
      .to_string(),
  }
}

pub fn verdict_label(verdict: Verdict) -> &'static str {
  match verdict {
    Verdict::Success => "success",
    Verdict::Partial => "partial",
    Verdict::Fail => "fail",
  }
}
