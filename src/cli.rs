//! CLI argument definitions using clap derive macros.
//!
//! Crawl settings are global so they can be given before or after the
//! subcommand. Every setting is optional here: a missing flag falls back to
//! its environment variable, then the config file, then the built-in default.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Crawl a remote directory tree and compute a letter-frequency histogram.
///
/// Letterfreq walks a directory listing API (such as the GitHub contents
/// API), downloads every file matching the suffix filter, and counts the
/// letters across all of them.
#[derive(Parser, Debug)]
#[command(name = "letterfreq")]
#[command(author, version)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (defaults to ~/.config/letterfreq/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub crawl: CrawlArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one crawl and print the histogram as JSON
    Crawl(CrawlCommandArgs),

    /// Serve the histogram over HTTP at GET /api/letters/frequency
    Serve,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the effective configuration (token redacted)
    Show,
}

/// Options for `crawl`.
#[derive(Args, Debug, Clone, Default)]
pub struct CrawlCommandArgs {
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Crawl settings shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct CrawlArgs {
    /// Root directory listing URL
    #[arg(long, env = "LETTERFREQ_ROOT_URL", value_name = "URL", global = true)]
    pub root_url: Option<String>,

    /// Token sent as a bearer credential on listing requests
    #[arg(
        long,
        env = "LETTERFREQ_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN",
        global = true
    )]
    pub token: Option<String>,

    /// File-name suffix to include (repeatable or comma-separated; default .js,.ts)
    #[arg(
        long = "suffix",
        env = "LETTERFREQ_SUFFIXES",
        value_delimiter = ',',
        value_name = "SUFFIX",
        global = true
    )]
    pub suffixes: Vec<String>,

    /// Maximum concurrent file fetches (1-100)
    #[arg(short = 'c', long, env = "LETTERFREQ_CONCURRENCY", value_parser = clap::value_parser!(u8).range(1..=100), global = true)]
    pub concurrency: Option<u8>,

    /// Maximum retry attempts for transient failures (0-10)
    #[arg(short = 'r', long, env = "LETTERFREQ_MAX_RETRIES", value_parser = clap::value_parser!(u8).range(0..=10), global = true)]
    pub max_retries: Option<u8>,

    /// Maximum directory depth below the root (1-1024)
    #[arg(long, env = "LETTERFREQ_MAX_DEPTH", value_parser = clap::value_parser!(u16).range(1..=1024), global = true)]
    pub max_depth: Option<u16>,

    /// HTTP connect timeout in seconds (1-3600)
    #[arg(long = "connect-timeout", value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600), global = true)]
    pub connect_timeout_secs: Option<u64>,

    /// HTTP read timeout in seconds (1-3600)
    #[arg(long = "read-timeout", value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600), global = true)]
    pub read_timeout_secs: Option<u64>,

    /// Address `serve` listens on (default 127.0.0.1:8080)
    #[arg(long, env = "LETTERFREQ_BIND", value_name = "ADDR", global = true)]
    pub bind: Option<SocketAddr>,
}
