//! Listing model: the entries of one remote directory and the leaf targets
//! selected from them.
//!
//! The wire format is a JSON array of objects discriminated by `type`:
//!
//! ```json
//! [
//!   {"type": "file", "name": "a.js", "download_url": "https://raw.example/a.js"},
//!   {"type": "dir",  "name": "lib",  "url": "https://api.example/contents/lib"}
//! ]
//! ```
//!
//! Extra fields are ignored. Entries of any other type, or `file`/`dir`
//! entries missing their address, decode to [`ListingEntry::Unrecognized`]
//! so one odd sibling never fails the whole listing.

use serde::Deserialize;
use serde_json::Value;

use crate::fetch::FetchError;

/// Default leaf-name suffixes.
pub const DEFAULT_SUFFIXES: [&str; 2] = [".js", ".ts"];

/// One child of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEntry {
    /// A file with a content address.
    File {
        /// File name (last path segment).
        name: String,
        /// Address of the raw content.
        download_url: String,
    },
    /// A sub-directory with its own listing address.
    Dir {
        /// Directory name.
        name: String,
        /// Address of the sub-directory's listing.
        url: String,
    },
    /// Anything else (symlinks, submodules, malformed entries).
    Unrecognized {
        /// The wire `type` value, or `<missing>`.
        kind: String,
    },
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireEntry {
    File { name: String, download_url: String },
    Dir { name: String, url: String },
    #[serde(other)]
    Other,
}

impl ListingEntry {
    /// Converts one JSON object from a listing into an entry. Never fails.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("<missing>")
            .to_string();

        match serde_json::from_value::<WireEntry>(value) {
            Ok(WireEntry::File { name, download_url }) => Self::File { name, download_url },
            Ok(WireEntry::Dir { name, url }) => Self::Dir { name, url },
            Ok(WireEntry::Other) | Err(_) => Self::Unrecognized { kind },
        }
    }
}

/// Decodes a listing body fetched from `url`.
///
/// # Errors
///
/// Returns [`FetchError::Decode`] when the body is not a JSON array.
pub fn decode_listing(url: &str, body: &[u8]) -> Result<Vec<ListingEntry>, FetchError> {
    let values: Vec<Value> =
        serde_json::from_slice(body).map_err(|e| FetchError::decode(url, e))?;
    Ok(values.into_iter().map(ListingEntry::from_value).collect())
}

/// A matched file's content address: the unit of fetch-tokenize-merge work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeafTarget {
    /// File name, kept for logging.
    pub name: String,
    /// Content address to fetch.
    pub address: String,
}

/// Name-suffix filter applied to file entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixFilter {
    suffixes: Vec<String>,
}

impl Default for SuffixFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIXES)
    }
}

impl SuffixFilter {
    /// Creates a filter matching names that end with any of `suffixes`.
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: suffixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true when `name` ends with one of the configured suffixes.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// The configured suffixes.
    #[must_use]
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }
}
