//! End-to-end runs over temporary library and work roots.

mod common;
mod properties_tests;
mod scenarios_tests;
