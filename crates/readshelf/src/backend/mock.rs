//! In-memory backend for tests and offline runs.

use std::sync::Mutex;

use crate::error::{ReadshelfError, Result};
use crate::import::ImportedBook;

use super::api::{BookshelfApi, CommitResponse, PreviewResponse};

/// A book already present in the user's library.
#[derive(Debug, Clone)]
struct LibraryEntry {
    title: String,
    author: String,
    isbn: String,
}

/// Mock backend holding the user's library in memory.
///
/// Classification mirrors the real backend: a record is a duplicate when
/// its ISBN matches an existing entry, or failing that when title and
/// author match exactly (case-insensitive). Committed records are added to
/// the library, so a repeated import reports them as skipped.
pub struct MockBackend {
    library: Mutex<Vec<LibraryEntry>>,
    fail_preview: bool,
    fail_commit: bool,
}

impl MockBackend {
    /// Create a mock backend with an empty library.
    pub fn new() -> Self {
        Self {
            library: Mutex::new(Vec::new()),
            fail_preview: false,
            fail_commit: false,
        }
    }

    /// Create a mock backend seeded with `(title, author)` entries.
    pub fn with_library(entries: &[(&str, &str)]) -> Self {
        let library = entries
            .iter()
            .map(|(title, author)| LibraryEntry {
                title: title.to_string(),
                author: author.to_string(),
                isbn: String::new(),
            })
            .collect();
        Self {
            library: Mutex::new(library),
            fail_preview: false,
            fail_commit: false,
        }
    }

    /// A backend whose preview endpoint always fails.
    pub fn failing_preview() -> Self {
        Self {
            fail_preview: true,
            ..Self::new()
        }
    }

    /// A backend whose import endpoint always fails.
    pub fn failing_commit() -> Self {
        Self {
            fail_commit: true,
            ..Self::new()
        }
    }

    /// Number of books currently in the library.
    pub fn library_len(&self) -> usize {
        self.library.lock().expect("mock library lock").len()
    }

    fn is_duplicate(library: &[LibraryEntry], book: &ImportedBook) -> bool {
        let isbn = book.isbn.trim();
        if !isbn.is_empty() && library.iter().any(|e| e.isbn == isbn) {
            return true;
        }
        library.iter().any(|e| {
            e.title.eq_ignore_ascii_case(book.title.trim())
                && e.author.eq_ignore_ascii_case(book.author.trim())
        })
    }

    fn is_valid(book: &ImportedBook) -> bool {
        !book.title.trim().is_empty() && !book.author.trim().is_empty()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl BookshelfApi for MockBackend {
    fn preview_import(&self, books: &[ImportedBook]) -> Result<PreviewResponse> {
        if self.fail_preview {
            return Err(ReadshelfError::PreviewFailed(
                "mock backend set to fail".to_string(),
            ));
        }
        if books.is_empty() {
            return Err(ReadshelfError::PreviewFailed("no books provided".to_string()));
        }

        let library = self.library.lock().expect("mock library lock");
        let mut new_books = 0;
        let mut duplicates = 0;
        for book in books {
            if !Self::is_valid(book) {
                continue;
            }
            if Self::is_duplicate(&library, book) {
                duplicates += 1;
            } else {
                new_books += 1;
            }
        }

        Ok(PreviewResponse {
            books: books.to_vec(),
            new_books,
            duplicates,
        })
    }

    fn import_books(&self, books: &[ImportedBook]) -> Result<CommitResponse> {
        if self.fail_commit {
            return Err(ReadshelfError::CommitFailed(
                "mock backend set to fail".to_string(),
            ));
        }
        if books.is_empty() {
            return Err(ReadshelfError::CommitFailed("no books provided".to_string()));
        }

        let mut library = self.library.lock().expect("mock library lock");
        let mut imported = 0;
        let mut skipped = 0;
        for book in books {
            if !Self::is_valid(book) || Self::is_duplicate(&library, book) {
                skipped += 1;
                continue;
            }
            library.push(LibraryEntry {
                title: book.title.trim().to_string(),
                author: book.author.trim().to_string(),
                isbn: book.isbn.trim().to_string(),
            });
            imported += 1;
        }

        Ok(CommitResponse { imported, skipped })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
