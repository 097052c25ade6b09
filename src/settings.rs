//! Effective runtime settings.
//!
//! Precedence per key: command line, then environment (both resolved by
//! clap), then config file, then the built-in default.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use letterfreq_core::crawl::DEFAULT_MAX_DEPTH;
use letterfreq_core::fetch::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use letterfreq_core::listing::DEFAULT_SUFFIXES;
use letterfreq_core::{
    CrawlOrchestrator, DEFAULT_CONCURRENCY, DEFAULT_MAX_RETRIES, HttpClient, RetryPolicy,
    SuffixFilter, TreeWalker,
};
use url::Url;

use crate::app_config::FileConfig;
use crate::cli::CrawlArgs;

/// Root crawled when nothing else is configured.
pub const DEFAULT_ROOT_URL: &str = "https://api.github.com/repos/lodash/lodash/contents/";

/// Listen address used by `serve` when nothing else is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Fully resolved settings for one invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub root_url: String,
    pub token: Option<String>,
    pub suffixes: Vec<String>,
    pub concurrency: usize,
    pub max_retries: u32,
    pub max_depth: usize,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub bind: SocketAddr,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("root_url", &self.root_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("suffixes", &self.suffixes)
            .field("concurrency", &self.concurrency)
            .field("max_retries", &self.max_retries)
            .field("max_depth", &self.max_depth)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .field("bind", &self.bind)
            .finish()
    }
}

impl Settings {
    /// Merges CLI/env values over the config file over defaults.
    pub fn resolve(args: &CrawlArgs, file: Option<&FileConfig>) -> Result<Self> {
        let file = file.cloned().unwrap_or_default();

        let root_url = args
            .root_url
            .clone()
            .or(file.root_url)
            .unwrap_or_else(|| DEFAULT_ROOT_URL.to_string());
        validate_root_url(&root_url)?;

        let token = args
            .token
            .clone()
            .or(file.token)
            .filter(|t| !t.trim().is_empty());

        let suffixes: Vec<String> = if args.suffixes.is_empty() {
            file.suffixes
                .unwrap_or_else(|| DEFAULT_SUFFIXES.iter().map(ToString::to_string).collect())
        } else {
            args.suffixes.clone()
        }
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
        if suffixes.is_empty() {
            bail!("At least one non-empty suffix is required");
        }

        let bind = match args.bind.or(file.bind) {
            Some(addr) => addr,
            None => DEFAULT_BIND
                .parse()
                .context("default bind address is invalid")?,
        };

        Ok(Self {
            root_url,
            token,
            suffixes,
            concurrency: args
                .concurrency
                .or(file.concurrency)
                .map_or(DEFAULT_CONCURRENCY, usize::from),
            max_retries: args
                .max_retries
                .or(file.max_retries)
                .map_or(DEFAULT_MAX_RETRIES, u32::from),
            max_depth: args
                .max_depth
                .or(file.max_depth)
                .map_or(DEFAULT_MAX_DEPTH, usize::from),
            connect_timeout_secs: args
                .connect_timeout_secs
                .or(file.connect_timeout_secs)
                .unwrap_or(CONNECT_TIMEOUT_SECS),
            read_timeout_secs: args
                .read_timeout_secs
                .or(file.read_timeout_secs)
                .unwrap_or(READ_TIMEOUT_SECS),
            bind,
        })
    }

    /// Wires an HTTP client, walker and orchestrator from these settings.
    pub fn build_orchestrator(&self) -> Result<CrawlOrchestrator> {
        let client = Arc::new(HttpClient::with_timeouts(
            self.token.clone(),
            self.connect_timeout_secs,
            self.read_timeout_secs,
        ));
        let policy = RetryPolicy::with_max_retries(self.max_retries);
        let walker = TreeWalker::new(client.clone(), SuffixFilter::new(&self.suffixes))
            .with_max_depth(self.max_depth)
            .with_retry_policy(policy.clone());
        CrawlOrchestrator::new(walker, client, self.concurrency, policy)
            .context("Invalid crawl settings")
    }
}

fn validate_root_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw).with_context(|| format!("Invalid root URL '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Invalid root URL '{raw}': scheme must be http or https");
    }
    Ok(())
}
