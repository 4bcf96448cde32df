//! CLI module
//!
//! Command-line interface for the tap.
//!
//! # Commands
//!
//! - `check` - Probe the store and test the credentials
//! - `discover` - Print the catalog of available streams
//! - `sync` - Extract records as Singer messages

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
