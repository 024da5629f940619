//! CLI commands and argument parsing

use crate::config::ThrottleMode;
use crate::search::ContinuationPolicy;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Backfill every tweet matching a search query
#[derive(Parser, Debug)]
#[command(name = "tweet-backfill")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Profile file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch all tweets matching a query, newest first
    Search {
        /// Search query
        query: String,

        #[command(flatten)]
        args: SearchArgs,
    },

    /// Print the resolved profile with secrets masked
    ShowConfig,
}

/// Search flags; each one overrides the profile
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchArgs {
    /// Only return tweets newer than this id
    #[arg(long)]
    pub since_id: Option<u64>,

    /// Only return tweets at or below this id (resume from a previous `min_id - 1`)
    #[arg(long)]
    pub max_id: Option<u64>,

    /// Language filter (ISO 639-1)
    #[arg(long)]
    pub lang: Option<String>,

    /// Result type: recent, popular or mixed
    #[arg(long)]
    pub result_type: Option<String>,

    /// Auth context whose quota window paces requests
    #[arg(long, value_name = "MODE")]
    pub auth: Option<ThrottleMode>,

    /// When a non-empty page ends the search
    #[arg(long)]
    pub policy: Option<ContinuationPolicy>,

    /// API base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
