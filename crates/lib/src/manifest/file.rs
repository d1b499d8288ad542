//! Semantic view over a module file.
//!
//! [`ModFile`] validates the directives the rest of the crate relies on
//! (`module`, `require`, `replace`) and exposes the replace-list mutations
//! used during synthesis. All edits go through the syntax tree, so comments
//! and unrelated directives survive a rewrite.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use super::quote::{auto_quote, unquote};
use super::syntax::{Document, Line, SyntaxError};

/// Directives accepted in a module file.
const KNOWN_VERBS: &[&str] = &[
  "module",
  "go",
  "toolchain",
  "godebug",
  "require",
  "exclude",
  "replace",
  "retract",
  "tool",
  "ignore",
];

const REPLACE_USAGE: &str =
  "usage: replace module/path [v1.2.3] => other/module v1.4 or replace module/path [v1.2.3] => ../local/directory";

/// A declared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Require {
  pub path: String,
  pub version: String,
}

/// A replace directive: `old [version] => new [version]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replace {
  pub old_path: String,
  pub old_version: Option<String>,
  pub new_path: String,
  pub new_version: Option<String>,
}

/// Errors raised while parsing, editing or formatting a module file.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("module file is not valid UTF-8: {0}")]
  Utf8(#[from] std::str::Utf8Error),

  #[error(transparent)]
  Syntax(#[from] SyntaxError),

  #[error("line {line}: {message}")]
  Directive { line: usize, message: String },

  #[error("missing module directive")]
  MissingModule,

  #[error("invalid replace {old} => {new}: {reason}")]
  InvalidReplace { old: String, new: String, reason: String },

  /// The rendered text failed to parse again.
  #[error("formatted module file is invalid: {0}")]
  Format(Box<ManifestError>),
}

fn directive_error(line: &Line, message: impl Into<String>) -> ManifestError {
  ManifestError::Directive {
    line: line.line_no,
    message: message.into(),
  }
}

fn unquote_arg(line: &Line, token: &str) -> Result<String, ManifestError> {
  unquote(token).map_err(|message| directive_error(line, message))
}

/// Whether a replacement target names a directory rather than a module.
pub fn is_local_path(path: &str) -> bool {
  path == "."
    || path == ".."
    || path.starts_with("./")
    || path.starts_with("../")
    || path.starts_with(".\\")
    || path.starts_with("..\\")
    || path.starts_with('/')
    || Path::new(path).is_absolute()
}

fn parse_require(line: &Line) -> Result<Require, ManifestError> {
  let [path, version] = line.args.as_slice() else {
    return Err(directive_error(line, "usage: require module/path v1.2.3"));
  };

  Ok(Require {
    path: unquote_arg(line, path)?,
    version: unquote_arg(line, version)?,
  })
}

fn parse_replace(line: &Line) -> Result<Replace, ManifestError> {
  let args = &line.args;
  let arrow = args.iter().position(|arg| arg == "=>");
  let Some(arrow @ (1 | 2)) = arrow else {
    return Err(directive_error(line, REPLACE_USAGE));
  };

  let old_path = unquote_arg(line, &args[0])?;
  let old_version = match arrow {
    2 => Some(unquote_arg(line, &args[1])?),
    _ => None,
  };

  let (new_path, new_version) = match &args[arrow + 1..] {
    [new] => (unquote_arg(line, new)?, None),
    [new, version] => (unquote_arg(line, new)?, Some(unquote_arg(line, version)?)),
    _ => return Err(directive_error(line, REPLACE_USAGE)),
  };

  validate_replacement(&new_path, new_version.as_deref()).map_err(|reason| directive_error(line, reason))?;

  Ok(Replace {
    old_path,
    old_version,
    new_path,
    new_version,
  })
}

fn validate_replacement(new_path: &str, new_version: Option<&str>) -> Result<(), String> {
  match (is_local_path(new_path), new_version) {
    (true, Some(_)) => Err(format!("replacement directory {} cannot have a version", new_path)),
    (false, None) => Err(format!(
      "replacement module {} without version must be a directory path (rooted or starting with ./ or ../)",
      new_path
    )),
    _ => Ok(()),
  }
}

/// A parsed and validated module file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModFile {
  syntax: Document,
  module: String,
}

impl ModFile {
  /// Parse module file bytes.
  ///
  /// # Errors
  ///
  /// Returns [`ManifestError`] if the bytes are not UTF-8, the syntax is
  /// malformed, an unknown directive is used, a `require` or `replace` line is
  /// malformed, or the `module` directive is missing or repeated.
  pub fn parse(bytes: &[u8]) -> Result<Self, ManifestError> {
    let text = std::str::from_utf8(bytes)?;
    let syntax = Document::parse(text)?;

    let mut module = None;
    for line in syntax.lines() {
      match line.verb.as_str() {
        "module" => {
          if module.is_some() {
            return Err(directive_error(line, "repeated module directive"));
          }
          let [path] = line.args.as_slice() else {
            return Err(directive_error(line, "usage: module module/path"));
          };
          module = Some(unquote_arg(line, path)?);
        }
        "require" => {
          parse_require(line)?;
        }
        "replace" => {
          parse_replace(line)?;
        }
        verb if KNOWN_VERBS.contains(&verb) => {}
        verb => return Err(directive_error(line, format!("unknown directive: {}", verb))),
      }
    }

    let module = module.ok_or(ManifestError::MissingModule)?;
    Ok(Self { syntax, module })
  }

  /// The module path declared by the `module` directive.
  pub fn module_path(&self) -> &str {
    &self.module
  }

  /// Declared dependencies, in source order.
  pub fn requires(&self) -> Vec<Require> {
    self
      .syntax
      .lines()
      .filter(|line| line.verb == "require")
      .filter_map(|line| parse_require(line).ok())
      .collect()
  }

  /// Live replace directives, in source order.
  pub fn replaces(&self) -> Vec<Replace> {
    self
      .syntax
      .lines()
      .filter(|line| line.verb == "replace")
      .filter_map(|line| parse_replace(line).ok())
      .collect()
  }

  /// Remove the replace directives for `old_path` at exactly `old_version`.
  ///
  /// Returns whether anything was removed.
  pub fn drop_replace(&mut self, old_path: &str, old_version: Option<&str>) -> bool {
    let mut dropped = false;
    for line in self.syntax.lines_mut().filter(|line| line.verb == "replace") {
      if let Ok(existing) = parse_replace(line)
        && existing.old_path == old_path
        && existing.old_version.as_deref() == old_version
      {
        line.mark_removed();
        dropped = true;
      }
    }
    dropped
  }

  /// Remove every replace directive written in the file.
  ///
  /// Returns the number of directives removed. A second call removes nothing.
  pub fn drop_all_replaces(&mut self) -> usize {
    let mut dropped = 0;
    for line in self.syntax.lines_mut().filter(|line| line.verb == "replace") {
      line.mark_removed();
      dropped += 1;
    }
    dropped
  }

  /// Add or update the replacement for `old_path`.
  ///
  /// An existing directive for the same path (and version, when one is
  /// given) is updated in place and any further duplicates are removed;
  /// otherwise a new directive is added next to the existing ones.
  ///
  /// # Errors
  ///
  /// Returns [`ManifestError::InvalidReplace`] if a path is empty, a local
  /// directory target carries a version, or a module target lacks one.
  pub fn add_replace(
    &mut self,
    old_path: &str,
    old_version: Option<&str>,
    new_path: &str,
    new_version: Option<&str>,
  ) -> Result<(), ManifestError> {
    let invalid = |reason: String| ManifestError::InvalidReplace {
      old: old_path.to_string(),
      new: new_path.to_string(),
      reason,
    };

    if old_path.is_empty() || new_path.is_empty() {
      return Err(invalid("paths must not be empty".to_string()));
    }
    validate_replacement(new_path, new_version).map_err(invalid)?;

    let mut args = vec![auto_quote(old_path)];
    args.extend(old_version.map(auto_quote));
    args.push("=>".to_string());
    args.push(auto_quote(new_path));
    args.extend(new_version.map(auto_quote));

    let mut updated = false;
    for line in self.syntax.lines_mut().filter(|line| line.verb == "replace") {
      let Ok(existing) = parse_replace(line) else {
        continue;
      };
      if existing.old_path != old_path || (old_version.is_some() && existing.old_version.as_deref() != old_version) {
        continue;
      }
      if updated {
        line.mark_removed();
      } else {
        line.args = args.clone();
        updated = true;
      }
    }

    if !updated {
      self.syntax.add_line("replace", args);
    }

    Ok(())
  }

  /// Order replace blocks by replaced module path, then version.
  pub fn sort_replaces(&mut self) {
    self.syntax.sort_blocks_by_key("replace", |line| {
      parse_replace(line)
        .map(|replace| (replace.old_path, replace.old_version))
        .ok()
    });
  }

  /// Render canonical module file bytes.
  ///
  /// # Errors
  ///
  /// Returns [`ManifestError::Format`] if the rendered text would not parse.
  pub fn format(&self) -> Result<Vec<u8>, ManifestError> {
    let text = self.syntax.render();
    Self::parse(text.as_bytes()).map_err(|err| ManifestError::Format(Box::new(err)))?;
    Ok(text.into_bytes())
  }
}
