//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Paged fetches against a rate-limited fitness API
#[derive(Parser, Debug)]
#[command(name = "fitpage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL from the config
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Bearer token for the API
    #[arg(long, global = true, env = "FITPAGE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

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
    /// Fetch a single page
    Fetch {
        /// Endpoint path relative to the base URL, e.g. athlete/activities
        #[arg(long)]
        path: String,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Page size; defaults to the configured maximum
        #[arg(long)]
        per_page: Option<u32>,

        /// Items to drop from the start of the page
        #[arg(long, default_value = "0")]
        skip_first: u32,

        /// Items to drop from the end of the page
        #[arg(long, default_value = "0")]
        skip_last: u32,
    },

    /// Fetch every page until the endpoint runs dry
    FetchAll {
        /// Endpoint path relative to the base URL
        #[arg(long)]
        path: String,

        /// Print each page as it arrives instead of after the last one.
        /// If a later page fails, records already printed stay printed, so
        /// the output may be partial.
        #[arg(long)]
        stream: bool,
    },

    /// Print the effective configuration as YAML
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
