//! HTTP client for the book-tracking backend.

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::error::{ReadshelfError, Result};
use crate::import::ImportedBook;

use super::api::{BookshelfApi, CommitResponse, ImportRequest, PreviewResponse};

/// Default backend address.
const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Backend client over HTTP.
///
/// Requests are one-shot with no retry and no explicit timeout. Preview and
/// commit each collapse any transport failure or non-2xx status into a
/// single generic error: when a batch fails the client cannot know how much
/// of it was applied, so the operation is reported as a whole.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    /// Create a client against `READSHELF_API_URL`, or the default address.
    ///
    /// A bearer token is picked up from `READSHELF_TOKEN` when set.
    pub fn new() -> Result<Self> {
        let base_url =
            std::env::var("READSHELF_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::with_base_url(base_url)
    }

    /// Create a client against a specific base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ReadshelfError::Config(format!("failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: std::env::var("READSHELF_TOKEN").ok(),
        })
    }

    /// Set the bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The backend address this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(ref token) = self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ReadshelfError::Config(format!("invalid API token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        books: &[ImportedBook],
        failure: fn(String) -> ReadshelfError,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&ImportRequest { books })
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    failure(format!("could not reach the backend at {}", self.base_url))
                } else {
                    failure(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(failure(format!("backend returned {}", response.status())));
        }

        response
            .json()
            .map_err(|e| failure(format!("invalid response body: {}", e)))
    }
}

impl BookshelfApi for HttpBackend {
    fn preview_import(&self, books: &[ImportedBook]) -> Result<PreviewResponse> {
        self.post(
            "/api/import/goodreads/preview",
            books,
            ReadshelfError::PreviewFailed,
        )
    }

    fn import_books(&self, books: &[ImportedBook]) -> Result<CommitResponse> {
        self.post("/api/import/goodreads", books, ReadshelfError::CommitFailed)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpBackend::with_base_url("http://localhost:5000/").unwrap();
        assert_eq!(backend.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_with_token() {
        let backend = HttpBackend::with_base_url("http://localhost:5000")
            .unwrap()
            .with_token("secret");
        let headers = backend.build_headers().unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer secret");
    }
}
