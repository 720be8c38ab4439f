//! medsim-cli library root.
//!
//! Re-exports internal modules so integration tests can exercise the
//! command parser and config handling without driving the REPL.

pub mod commands;
pub mod config;
pub mod repl;
