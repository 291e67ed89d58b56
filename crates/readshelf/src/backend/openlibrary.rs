//! Open Library ISBN metadata lookup.
//!
//! Fills in title/author for history records that carry only an ISBN.
//! Lookups are best-effort: any failure reads as "no match" so an
//! unreachable metadata service never blocks an import.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ReadshelfError, Result};

/// Default Open Library address.
const DEFAULT_API_URL: &str = "https://openlibrary.org";

/// Hard client-side timeout for metadata lookups.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimal metadata resolved for an ISBN.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IsbnMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Resolves book metadata from an ISBN.
pub trait MetadataLookup: Send + Sync {
    /// Look up an ISBN; `None` when nothing could be resolved.
    fn lookup_isbn(&self, isbn: &str) -> Option<IsbnMetadata>;

    /// Name of this lookup (for logging/debugging).
    fn name(&self) -> &str;
}

/// Metadata lookup backed by the public Open Library API.
pub struct OpenLibraryLookup {
    client: Client,
    base_url: String,
}

impl OpenLibraryLookup {
    /// Create a lookup against the public Open Library service.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_API_URL)
    }

    /// Create a lookup against a specific base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .map_err(|e| ReadshelfError::Config(format!("failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.json().ok()
    }
}

impl MetadataLookup for OpenLibraryLookup {
    fn lookup_isbn(&self, isbn: &str) -> Option<IsbnMetadata> {
        let normalized = isbn.replace('-', "");
        let normalized = normalized.trim();
        if normalized.is_empty() {
            return None;
        }

        let edition: EditionResponse = self.fetch_json(&format!("/isbn/{}.json", normalized))?;

        // Resolve the first author reference, if any; author records live
        // under their own key (e.g. "/authors/OL79034A").
        let author = edition.authors.first().and_then(|a| {
            let record: AuthorResponse = self.fetch_json(&format!("{}.json", a.key))?;
            record.name
        });

        let metadata = IsbnMetadata {
            title: edition.title,
            author,
        };
        if metadata.title.is_none() && metadata.author.is_none() {
            None
        } else {
            Some(metadata)
        }
    }

    fn name(&self) -> &str {
        "openlibrary"
    }
}

#[derive(Debug, Deserialize)]
struct EditionResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<AuthorRef>,
}

#[derive(Debug, Deserialize)]
struct AuthorRef {
    key: String,
}

#[derive(Debug, Deserialize)]
struct AuthorResponse {
    #[serde(default)]
    name: Option<String>,
}
