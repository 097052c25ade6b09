//! Constants for the fetch module (timeouts, listing media type).

use std::time::Duration;

/// Default HTTP connect timeout (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default HTTP read timeout (60 seconds per listing or file).
pub const READ_TIMEOUT_SECS: u64 = 60;

/// Media type requested from the listing provider.
pub const LISTING_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Maximum Retry-After header value (1 hour) to prevent excessive delays.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(3600);
