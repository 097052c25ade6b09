//! Crawl command handler: run one crawl and print the histogram.

use anyhow::{Context, Result};
use letterfreq_core::CrawlResult;
use tracing::info;

use crate::settings::Settings;

pub async fn run_crawl_command(settings: &Settings, pretty: bool) -> Result<()> {
    let orchestrator = settings.build_orchestrator()?;
    info!(root = %settings.root_url, "Crawl starting");

    let (result, stats) = orchestrator
        .run_with_stats(&settings.root_url)
        .await
        .with_context(|| format!("Crawl of '{}' failed", settings.root_url))?;

    info!(
        files = stats.discovered(),
        completed = stats.completed(),
        failed = stats.failed(),
        retried = stats.retried(),
        letters = result.len(),
        "Crawl complete"
    );

    println!("{}", render_result(&result, pretty)?);
    Ok(())
}

/// Serializes a result as an ordered JSON object.
pub fn render_result(result: &CrawlResult, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    };
    rendered.context("Failed to serialize crawl result")
}
