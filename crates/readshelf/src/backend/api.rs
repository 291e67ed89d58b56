//! Backend API contract for the book-tracking service.
//!
//! The backend owns persistence and duplicate detection. The client never
//! guesses its own matching heuristic — classification is whatever the
//! preview endpoint says it is.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::import::ImportedBook;

/// Request body for both the preview and import endpoints.
#[derive(Debug, Serialize)]
pub struct ImportRequest<'a> {
    pub books: &'a [ImportedBook],
}

/// Response from `POST /api/import/goodreads/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    /// The submitted records, possibly reordered by the backend.
    pub books: Vec<ImportedBook>,
    /// Records not yet in the user's library.
    #[serde(rename = "new")]
    pub new_books: usize,
    /// Records the backend matched against the existing library.
    pub duplicates: usize,
}

/// Response from `POST /api/import/goodreads`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CommitResponse {
    /// Number of records the backend imported.
    pub imported: usize,
    /// Number the backend skipped (already linked or invalid). Not all
    /// backends report this.
    #[serde(default)]
    pub skipped: usize,
}

/// Book-tracking backend operations used by the import flow.
///
/// Implementations must be thread-safe (Send + Sync) so one backend handle
/// can be shared across sessions.
pub trait BookshelfApi: Send + Sync {
    /// Classify records against the user's existing library without
    /// importing anything.
    fn preview_import(&self, books: &[ImportedBook]) -> Result<PreviewResponse>;

    /// Import the full record set.
    fn import_books(&self, books: &[ImportedBook]) -> Result<CommitResponse>;

    /// Name of this backend (for logging/debugging).
    fn name(&self) -> &str;
}
