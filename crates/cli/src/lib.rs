//! Thin command-line adapter over the Spantry inventory core.
//!
//! Argument parsing, the JSON snapshot file and output formatting live here;
//! all rules live in `spantry-inventory`.

pub mod cli;
pub mod commands;
pub mod storage;

pub use cli::{Cli, Command};
