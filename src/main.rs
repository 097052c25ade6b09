//! CLI entry point for the letterfreq tool.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app_config;
mod cli;
mod commands;
mod settings;

use cli::{Cli, Command, ConfigCommand};
use settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // stdout carries the JSON result; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let loaded_config = app_config::load_config(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli.crawl, loaded_config.config.as_ref())?;
    debug!(?settings, "Effective settings resolved");

    match cli.command {
        Command::Crawl(args) => commands::run_crawl_command(&settings, args.pretty).await,
        Command::Serve => commands::run_serve_command(&settings).await,
        Command::Config {
            command: ConfigCommand::Show,
        } => commands::run_config_show_command(&settings, &loaded_config),
    }
}
