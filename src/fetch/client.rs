//! HTTP client wrapper for the listing and content providers.
//!
//! One [`HttpClient`] is built per process and cloned into every crawl unit;
//! clones share reqwest's connection pool.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use reqwest::header::{ACCEPT, RETRY_AFTER};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, LISTING_MEDIA_TYPE, READ_TIMEOUT_SECS};
use super::{ContentSource, FetchError, ListingSource};
use crate::listing::{ListingEntry, decode_listing};
use crate::user_agent;

/// Bearer token attached to listing requests. `Debug` never prints it.
#[derive(Clone)]
struct Token(String);

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// HTTP client for listing and content requests.
///
/// # Example
///
/// ```no_run
/// use letterfreq_core::fetch::{HttpClient, ListingSource};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new(Some("ghp_example".to_string()));
/// let entries = client
///     .fetch_listing("https://api.github.com/repos/lodash/lodash/contents/")
///     .await?;
/// println!("{} entries", entries.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    token: Option<Token>,
}

impl HttpClient {
    /// Creates a client with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self::with_timeouts(token, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    #[instrument(level = "debug", skip(token))]
    pub fn with_timeouts(
        token: Option<String>,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .user_agent(user_agent::default_user_agent())
            .gzip(true)
            .build()
            .expect("failed to build HTTP client with static configuration");

        let token = token.filter(|t| !t.trim().is_empty()).map(Token);
        debug!(has_token = token.is_some(), "created HTTP client");

        Self { client, token }
    }

    /// Returns true when listing requests carry an `Authorization` header.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    async fn get(&self, url: &str, listing: bool) -> Result<reqwest::Response, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::invalid_url(url));
        }

        let mut request = self.client.get(parsed);
        if listing {
            request = request.header(ACCEPT, LISTING_MEDIA_TYPE);
            if let Some(Token(token)) = &self.token {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::network(url, e)
            }
        })?;

        // Only 200 carries a listing or file body; other 2xx are failures.
        if response.status() != StatusCode::OK {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(std::string::ToString::to_string);
            return Err(FetchError::http_status_with_retry_after(
                url,
                response.status().as_u16(),
                retry_after,
            ));
        }

        Ok(response)
    }

    async fn read_body(url: &str, response: reqwest::Response) -> Result<Bytes, FetchError> {
        response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::network(url, e)
            }
        })
    }
}

#[async_trait]
impl ListingSource for HttpClient {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_listing(&self, url: &str) -> Result<Vec<ListingEntry>, FetchError> {
        let response = self.get(url, true).await?;
        let body = Self::read_body(url, response).await?;
        let entries = decode_listing(url, &body)?;
        debug!(entries = entries.len(), "fetched listing");
        Ok(entries)
    }
}

#[async_trait]
impl ContentSource for HttpClient {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_content(&self, url: &str) -> Result<Bytes, FetchError> {
        let response = self.get(url, false).await?;
        let body = Self::read_body(url, response).await?;
        debug!(bytes = body.len(), "fetched content");
        Ok(body)
    }
}
