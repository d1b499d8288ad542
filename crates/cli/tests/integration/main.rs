//! CLI integration tests.

mod common;
mod fix_tests;
mod output_tests;
