//! modfix: point module replace directives at local checkouts.

mod cmd;
mod output;
mod signal;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use modfix_lib::cancel::CancelFlag;
use modfix_lib::config::{Config, parse_bool};

use crate::output::{OutputFormat, print_error};

/// Rewrite the replace directives of the module files under a work root so
/// every dependency found under the library root resolves to its local copy.
#[derive(Parser)]
#[command(name = "modfix")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Work root holding the module files to rewrite [env: WORKPATH] [default: .]
  #[arg(short = 'w', long, value_name = "DIR")]
  work_path: Option<PathBuf>,

  /// Library root holding every known module [env: GOPATH]
  #[arg(short = 'g', long, visible_alias = "library-path", value_name = "DIR")]
  go_path: Option<PathBuf>,

  /// Descend into subdirectories of the work root [env: MODFIX_RECURSIVE]
  #[arg(short, long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = parse_flag)]
  recursive: Option<bool>,

  /// Descend into hidden directories of the library root [env: MODFIX_HIDDEN]
  #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = parse_flag)]
  enable_hidden: Option<bool>,

  /// Log every traversal decision [env: MODFIX_DEBUG]
  #[arg(short, long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = parse_flag)]
  debug: Option<bool>,

  /// Also list library modules in the report [env: MODFIX_VERBOSE]
  #[arg(short, long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = parse_flag)]
  verbose: Option<bool>,

  /// Report changes without writing [env: MODFIX_DRYRUN]
  #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = parse_flag)]
  dry_run: Option<bool>,

  /// Replace every known module, not only required ones [env: MODFIX_ADD_ALL]
  #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = parse_flag)]
  add_all: Option<bool>,

  /// Report format
  #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,
}

fn parse_flag(value: &str) -> Result<bool, String> {
  parse_bool(value).ok_or_else(|| format!("expected a boolean, got '{}'", value))
}

impl Cli {
  /// Overlay the flags that were given onto `config`.
  fn apply_to(&self, config: &mut Config) {
    if let Some(path) = &self.work_path {
      config.work_path = path.clone();
    }
    if let Some(path) = &self.go_path {
      config.library_path = Some(path.clone());
    }

    let flags = [
      (self.recursive, &mut config.recursive),
      (self.enable_hidden, &mut config.enable_hidden),
      (self.debug, &mut config.debug),
      (self.verbose, &mut config.verbose),
      (self.dry_run, &mut config.dry_run),
      (self.add_all, &mut config.add_all),
    ];
    for (flag, slot) in flags {
      if let Some(value) = flag {
        *slot = value;
      }
    }
  }
}

fn init_tracing(debug: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if debug {
      EnvFilter::new("modfix_lib=debug,modfix=debug")
    } else {
      EnvFilter::new("warn")
    }
  });

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
  let mut config = Config::from_env().context("Failed to load configuration")?;
  cli.apply_to(&mut config);

  init_tracing(config.debug);

  let runtime = tokio::runtime::Builder::new_multi_thread()
    .worker_threads(1)
    .enable_all()
    .build()
    .context("Failed to create async runtime")?;

  let cancel = CancelFlag::new();
  runtime.spawn(signal::cancel_on_signal(cancel.clone()));

  let result = cmd::cmd_fix(&config, &cancel, cli.output);
  runtime.shutdown_background();
  result
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  match run(cli) {
    Ok(code) => code,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
