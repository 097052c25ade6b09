//! REST surface for triggering crawls.
//!
//! - `GET /api/letters/frequency` - runs one crawl of the configured root and
//!   returns the histogram as an ordered JSON object, or 500 with no body
//! - `GET /api/health` - liveness check
//!
//! Each request runs its own crawl with its own aggregator, so concurrent
//! requests never see each other's counts. If the client disconnects, the
//! handler future is dropped and the crawl's units are aborted with it.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::crawl::CrawlOrchestrator;

/// Errors from running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The requested address.
        addr: SocketAddr,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an IO error.
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// Orchestrator used for every crawl request.
    pub orchestrator: CrawlOrchestrator,
    /// Root listing address crawled on each request.
    pub root_url: String,
}

/// Builds the API router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/letters/frequency", get(letter_frequency));

    Router::new().nest("/api", api).with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn letter_frequency(State(state): State<Arc<AppState>>) -> Response {
    info!(root = %state.root_url, "received letter frequency request");
    match state.orchestrator.run(&state.root_url).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            error!(error = %e, "crawl failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Binds `addr` and serves until Ctrl-C.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address cannot be bound, or
/// [`ServerError::Io`] if the server fails while running.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    serve_on(listener, state, shutdown_signal()).await
}

/// Serves on an already-bound listener until `shutdown` completes.
///
/// # Errors
///
/// Returns [`ServerError::Io`] if the server fails while running.
pub async fn serve_on<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(local) = listener.local_addr() {
        info!(addr = %local, "listening");
    }
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl-C handler, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down gracefully");
}
