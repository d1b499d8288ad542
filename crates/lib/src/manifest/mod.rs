//! Module file parsing and canonical formatting.
//!
//! - [`syntax`] - line-oriented syntax tree, lexer and renderer
//! - [`quote`] - token quoting rules
//! - [`ModFile`] - validated view with `require`/`replace` access and edits

mod file;
pub mod quote;
pub mod syntax;

pub use file::*;
