//! Shared utilities.
//!
//! Lexical path helpers used by the synthesizer.

pub mod path;
