//! Readshelf: reading-history import pipeline for a personal book tracker.
//!
//! Readshelf parses reading-history exports — the Goodreads CSV export with
//! its loose quoting, or well-formed CSV/JSON history files — stages them
//! for review against the user's existing library, and commits the
//! finalized set to the book-tracking backend.
//!
//! The backend owns persistence and duplicate detection; this crate owns
//! parsing, the working preview with its local edits, and the commit flow.
//!
//! # Example
//!
//! ```no_run
//! use readshelf::{HttpBackend, ImportSession};
//!
//! let backend = HttpBackend::new().expect("backend client");
//! let mut session = ImportSession::new(backend);
//!
//! let csv = "Title,Author,My Rating\nDune,Frank Herbert,5\n";
//! let preview = session.upload(csv).expect("preview");
//! println!("new: {}, duplicates: {}", preview.new_count, preview.duplicate_count);
//!
//! let imported = session.commit().expect("commit");
//! println!("imported {} books", imported);
//! ```

pub mod backend;
pub mod error;
pub mod import;

pub use backend::{
    BookshelfApi, CommitResponse, HttpBackend, IsbnMetadata, MetadataLookup, MockBackend,
    OpenLibraryLookup, PreviewResponse,
};
pub use error::{ReadshelfError, Result};
pub use import::{
    FileFormat, HeaderIndex, HistoryReader, ImportPreview, ImportSession, ImportState,
    ImportedBook, REVIEW_LIMIT, RequestToken, SourceMetadata, infer_format, parse_export,
    split_fields,
};
