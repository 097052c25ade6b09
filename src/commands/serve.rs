//! Serve command handler: expose crawls over HTTP.

use std::sync::Arc;

use anyhow::{Context, Result};
use letterfreq_core::server::{self, AppState};
use tracing::info;

use crate::settings::Settings;

pub async fn run_serve_command(settings: &Settings) -> Result<()> {
    let orchestrator = settings.build_orchestrator()?;
    let state = Arc::new(AppState {
        orchestrator,
        root_url: settings.root_url.clone(),
    });

    info!(bind = %settings.bind, root = %settings.root_url, "Server starting");
    server::serve(settings.bind, state)
        .await
        .context("Server stopped with an error")
}
