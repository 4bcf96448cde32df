//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// WooCommerce extraction tap
#[derive(Parser, Debug)]
#[command(name = "tap-woocommerce")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// State file (JSON), updated as streams complete
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Inline state JSON
    #[arg(long, global = true)]
    pub state_json: Option<String>,

    /// Output format for `check` and `discover`
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
    /// Probe the store version and test the credentials
    Check,

    /// Print the catalog of streams this store serves
    Discover,

    /// Extract records as Singer messages on stdout
    Sync {
        /// Streams to sync (comma-separated, empty = all)
        #[arg(long)]
        streams: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

impl Commands {
    /// Stream names passed on the command line
    pub fn stream_names(&self) -> Option<Vec<String>> {
        match self {
            Commands::Sync {
                streams: Some(streams),
            } => Some(
                streams
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect(),
            ),
            _ => None,
        }
    }
}
