//! CLI module
//!
//! Command-line interface for running searches.
//!
//! # Commands
//!
//! - `search` - Backfill a query and print the tweets
//! - `show-config` - Print the resolved profile

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, SearchArgs};
pub use runner::Runner;
