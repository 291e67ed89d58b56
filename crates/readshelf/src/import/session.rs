//! Import session state machine.
//!
//! Owns the working preview between upload and commit and applies local
//! edits. Duplicate classification is delegated to the backend's preview
//! endpoint; the session only holds what the backend returned.
//!
//! The flow is strictly ordered: a preview must be staged before a commit
//! can start, enforced by the state machine alone. Responses carry a
//! [`RequestToken`] so a slow reply that arrives after a cancellation or a
//! re-upload is dropped instead of stomping newer state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::backend::{BookshelfApi, CommitResponse, PreviewResponse};
use crate::error::{ReadshelfError, Result};

use super::goodreads;
use super::record::ImportedBook;

/// Number of records shown for review. The commit payload always carries
/// the full set, not just the shown slice.
pub const REVIEW_LIMIT: usize = 10;

/// The staged result of a preview call, held until commit or cancellation.
#[derive(Debug, Clone, Serialize)]
pub struct ImportPreview {
    /// All parsed records, in backend-returned order.
    pub books: Vec<ImportedBook>,
    /// Books the backend did not find in the user's library.
    pub new_count: usize,
    /// Books the backend reported as already present.
    pub duplicate_count: usize,
    /// When the preview was staged.
    pub created_at: DateTime<Utc>,
}

impl ImportPreview {
    /// The slice of records shown for review.
    pub fn review_slice(&self) -> &[ImportedBook] {
        &self.books[..self.books.len().min(REVIEW_LIMIT)]
    }

    /// Records beyond the review slice that will still be imported.
    pub fn hidden_count(&self) -> usize {
        self.books.len().saturating_sub(REVIEW_LIMIT)
    }
}

/// Where the import flow currently stands.
#[derive(Debug, Clone)]
pub enum ImportState {
    /// No file staged.
    Idle,
    /// A preview is staged and open for edits.
    Uploaded(ImportPreview),
    /// A commit request is in flight.
    Committing(ImportPreview),
    /// The import completed; only the count survives.
    Done(usize),
}

impl ImportState {
    /// Short label for reporting.
    pub fn label(&self) -> &'static str {
        match self {
            ImportState::Idle => "idle",
            ImportState::Uploaded(_) => "uploaded",
            ImportState::Committing(_) => "committing",
            ImportState::Done(_) => "done",
        }
    }
}

/// Identity of one outstanding backend request.
///
/// A token is minted when the request starts and checked when its response
/// is applied; cancellation and re-upload invalidate all earlier tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Owns the working import state for one user flow.
pub struct ImportSession {
    backend: Arc<dyn BookshelfApi>,
    state: ImportState,
    generation: u64,
}

impl ImportSession {
    /// Create a session against a backend.
    pub fn new(backend: impl BookshelfApi + 'static) -> Self {
        Self::with_shared(Arc::new(backend))
    }

    /// Create a session against a shared backend handle.
    pub fn with_shared(backend: Arc<dyn BookshelfApi>) -> Self {
        Self {
            backend,
            state: ImportState::Idle,
            generation: 0,
        }
    }

    /// Current flow state.
    pub fn state(&self) -> &ImportState {
        &self.state
    }

    /// The staged preview, if any.
    pub fn preview(&self) -> Option<&ImportPreview> {
        match &self.state {
            ImportState::Uploaded(preview) | ImportState::Committing(preview) => Some(preview),
            _ => None,
        }
    }

    /// Parse a Goodreads export and stage the backend's preview of it.
    ///
    /// Replaces any previously staged preview wholesale. Fails before any
    /// network call when the export contains no valid rows.
    pub fn upload(&mut self, csv_text: &str) -> Result<&ImportPreview> {
        let books = goodreads::parse_export(csv_text)?;
        self.upload_books(books)
    }

    /// Stage a pre-parsed record set and fetch the backend's preview of it.
    pub fn upload_books(&mut self, books: Vec<ImportedBook>) -> Result<&ImportPreview> {
        if books.is_empty() {
            return Err(ReadshelfError::NoValidBooks);
        }
        let token = self.begin_preview();
        let response = self.backend.preview_import(&books)?;
        self.apply_preview(token, response)?;
        match &self.state {
            ImportState::Uploaded(preview) => Ok(preview),
            _ => Err(ReadshelfError::InvalidState("preview was not staged")),
        }
    }

    /// Start a preview request, invalidating any outstanding one.
    ///
    /// Part of the split-phase surface for drivers that run the network
    /// call off-session; [`Self::upload`] composes both phases.
    pub fn begin_preview(&mut self) -> RequestToken {
        self.generation += 1;
        RequestToken(self.generation)
    }

    /// Apply a preview response if it still matches the active request.
    ///
    /// A stale token — the session was cancelled or re-uploaded since the
    /// request started — is rejected without touching current state.
    pub fn apply_preview(&mut self, token: RequestToken, response: PreviewResponse) -> Result<()> {
        if token.0 != self.generation {
            return Err(ReadshelfError::StaleResponse);
        }
        match self.state {
            ImportState::Committing(_) => {
                return Err(ReadshelfError::InvalidState("commit in flight"));
            }
            ImportState::Done(_) => {
                return Err(ReadshelfError::InvalidState("import already completed"));
            }
            ImportState::Idle | ImportState::Uploaded(_) => {}
        }

        self.state = ImportState::Uploaded(ImportPreview {
            books: response.books,
            new_count: response.new_books,
            duplicate_count: response.duplicates,
            created_at: Utc::now(),
        });
        Ok(())
    }

    /// Replace the ISBN of the staged book at `index`.
    ///
    /// The value is not validated, and duplicate classification is not
    /// re-run: the new/duplicate counts keep the backend's original answer.
    /// Known limitation of the one-shot preview contract.
    pub fn set_isbn(&mut self, index: usize, isbn: impl Into<String>) -> Result<()> {
        let preview = match &mut self.state {
            ImportState::Uploaded(preview) => preview,
            _ => return Err(ReadshelfError::InvalidState("no staged preview to edit")),
        };
        let book = preview
            .books
            .get_mut(index)
            .ok_or(ReadshelfError::BookIndex(index))?;
        book.isbn = isbn.into();
        Ok(())
    }

    /// Discard the staged preview and return to the upload step.
    ///
    /// Also invalidates any in-flight request so a late response is dropped
    /// instead of resurrecting the cancelled preview. Not offered while a
    /// commit is in flight or after completion.
    pub fn cancel(&mut self) {
        match self.state {
            ImportState::Idle | ImportState::Uploaded(_) => {
                self.generation += 1;
                self.state = ImportState::Idle;
            }
            ImportState::Committing(_) | ImportState::Done(_) => {}
        }
    }

    /// Send the staged import to the backend.
    ///
    /// The payload is the full record set, including records never shown
    /// for review. On failure the staged preview is restored so the flow
    /// can retry from the same state; the operation is atomic from this
    /// side even though the backend's batch semantics are opaque.
    pub fn commit(&mut self) -> Result<usize> {
        let (token, books) = self.begin_commit()?;
        match self.backend.import_books(&books) {
            Ok(response) => self.finish_commit(token, response),
            Err(err) => {
                self.fail_commit(token);
                Err(err)
            }
        }
    }

    /// Start a commit, moving the staged preview into the in-flight state.
    ///
    /// Returns the full record set for the request payload.
    pub fn begin_commit(&mut self) -> Result<(RequestToken, Vec<ImportedBook>)> {
        match std::mem::replace(&mut self.state, ImportState::Idle) {
            ImportState::Uploaded(preview) => {
                self.generation += 1;
                let books = preview.books.clone();
                self.state = ImportState::Committing(preview);
                Ok((RequestToken(self.generation), books))
            }
            other => {
                self.state = other;
                Err(ReadshelfError::InvalidState("no staged preview to commit"))
            }
        }
    }

    /// Apply a successful commit response, discarding the working preview.
    pub fn finish_commit(&mut self, token: RequestToken, response: CommitResponse) -> Result<usize> {
        if token.0 != self.generation {
            return Err(ReadshelfError::StaleResponse);
        }
        if !matches!(self.state, ImportState::Committing(_)) {
            return Err(ReadshelfError::InvalidState("no commit in flight"));
        }
        self.state = ImportState::Done(response.imported);
        Ok(response.imported)
    }

    /// Record a failed commit, restoring the staged preview so the user
    /// can retry without re-uploading. Stale tokens are ignored.
    pub fn fail_commit(&mut self, token: RequestToken) {
        if token.0 != self.generation {
            return;
        }
        match std::mem::replace(&mut self.state, ImportState::Idle) {
            ImportState::Committing(preview) => self.state = ImportState::Uploaded(preview),
            other => self.state = other,
        }
    }
}
