//! modfix-lib: Core types and logic for modfix
//!
//! This crate scans a library root and a work root for module files and
//! rewrites the work-root manifests so every locally available dependency is
//! replaced with a relative path to its on-disk copy:
//! - `manifest`: parsing and canonical formatting of module files
//! - `scan`: directory traversal that fills the [`registry::Registry`]
//! - `synth`: dependency-graph walk producing replace directives
//! - `finalize`: change detection and conditional writes
//! - `report`: per-manifest outcomes and the overall verdict
//! - `execute`: one run, from [`config::Config`] to [`report::Report`]

pub mod cancel;
pub mod config;
pub mod consts;
pub mod execute;
pub mod finalize;
pub mod manifest;
pub mod registry;
pub mod report;
pub mod scan;
pub mod synth;
pub mod util;
