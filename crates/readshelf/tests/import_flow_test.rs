//! Integration tests for the import flow: export text in, committed
//! library out, with the mock backend standing in for the service.

use std::sync::Arc;

use readshelf::{
    ImportSession, ImportState, ImportedBook, MockBackend, REVIEW_LIMIT, ReadshelfError,
    parse_export, split_fields,
};

/// Build a well-formed export with `n` unique rows.
fn export_with_rows(n: usize) -> String {
    let mut text = String::from("Title,Author,ISBN,My Rating,Date Read,Date Added,Bookshelves,My Review\n");
    for i in 0..n {
        text.push_str(&format!(
            "\"Book {i}\",\"Author {i}\",\"978000000{i:04}\",{rating},2023/01/02,2022/12/20,read,\"Notes, with commas\"\n",
            i = i,
            rating = i % 6,
        ));
    }
    text
}

// =============================================================================
// Tokenizer and Parser
// =============================================================================

#[test]
fn test_tokenizer_keeps_quotes_for_downstream_stripping() {
    assert_eq!(split_fields(r#"a,"b,c",d"#), vec!["a", "\"b,c\"", "d"]);
}

#[test]
fn test_parser_excludes_rows_with_empty_required_fields() {
    let result = parse_export("Title,Author,My Rating\n,Someone,5\n");
    assert!(matches!(result, Err(ReadshelfError::NoValidBooks)));
}

#[test]
fn test_parser_binds_rating_to_my_rating_column() {
    let text = "\"Book Title\",\"Author Name\",\"My Rating\",\"Average Rating\"\n\
                Dune,Frank Herbert,5,4.2\n";
    let books = parse_export(text).unwrap();
    assert_eq!(books[0].rating, 5);
}

#[test]
fn test_end_to_end_goodreads_row() {
    let text = "Title,Author,ISBN,My Rating,Date Read,Date Added,Bookshelves,My Review\n\
                \"Dune\",\"Frank Herbert\",\"9780441013593\",5,2023/01/02,2022/12/20,read,\"Great book, loved it\"\n";
    let books = parse_export(text).unwrap();

    assert_eq!(books.len(), 1);
    let book = &books[0];
    assert_eq!(book.title, "Dune");
    assert_eq!(book.author, "Frank Herbert");
    assert_eq!(book.isbn, "9780441013593");
    assert!(book.isbn13.is_empty());
    assert_eq!(book.rating, 5);
    assert_eq!(book.date_read, "2023/01/02");
    assert_eq!(book.date_added, "2022/12/20");
    assert_eq!(book.shelves, "read");
    assert_eq!(book.review, "Great book, loved it");
}

// =============================================================================
// Preview and Reconciliation
// =============================================================================

#[test]
fn test_round_trip_unique_rows_against_empty_library() {
    let n = 17;
    let mut session = ImportSession::new(MockBackend::new());
    let preview = session.upload(&export_with_rows(n)).unwrap();

    assert_eq!(preview.books.len(), n);
    assert_eq!(preview.new_count, n);
    assert_eq!(preview.duplicate_count, 0);
}

#[test]
fn test_preview_reports_existing_books_as_duplicates() {
    let backend = MockBackend::with_library(&[("Book 0", "Author 0"), ("Book 1", "Author 1")]);
    let mut session = ImportSession::new(backend);
    let preview = session.upload(&export_with_rows(5)).unwrap();

    assert_eq!(preview.new_count, 3);
    assert_eq!(preview.duplicate_count, 2);
}

#[test]
fn test_isbn_edit_is_idempotent() {
    let mut session = ImportSession::new(MockBackend::new());
    session.upload(&export_with_rows(3)).unwrap();

    session.set_isbn(1, "9780000000000").unwrap();
    let first: Vec<ImportedBook> = session.preview().unwrap().books.clone();
    let (new_count, duplicate_count) = {
        let preview = session.preview().unwrap();
        (preview.new_count, preview.duplicate_count)
    };

    session.set_isbn(1, "9780000000000").unwrap();
    let preview = session.preview().unwrap();
    assert_eq!(preview.books, first);
    assert_eq!(preview.new_count, new_count);
    assert_eq!(preview.duplicate_count, duplicate_count);
}

#[test]
fn test_review_slice_truncates_but_commit_sends_everything() {
    let backend = Arc::new(MockBackend::new());
    let mut session = ImportSession::with_shared(backend.clone());
    session.upload(&export_with_rows(25)).unwrap();

    {
        let preview = session.preview().unwrap();
        assert_eq!(preview.review_slice().len(), REVIEW_LIMIT);
        assert_eq!(preview.hidden_count(), 15);
    }

    let imported = session.commit().unwrap();
    assert_eq!(imported, 25);
    assert_eq!(backend.library_len(), 25);
}

// =============================================================================
// Commit and Failure Recovery
// =============================================================================

#[test]
fn test_commit_success_discards_preview_and_reports_count() {
    let mut session = ImportSession::new(MockBackend::new());
    session.upload(&export_with_rows(4)).unwrap();

    let imported = session.commit().unwrap();
    assert_eq!(imported, 4);
    assert!(session.preview().is_none());
    assert!(matches!(session.state(), ImportState::Done(4)));
}

#[test]
fn test_commit_failure_keeps_preview_for_retry() {
    let mut session = ImportSession::new(MockBackend::failing_commit());
    session.upload(&export_with_rows(4)).unwrap();

    let result = session.commit();
    assert!(matches!(result, Err(ReadshelfError::CommitFailed(_))));

    // The user can retry from the same state without re-uploading.
    let preview = session.preview().expect("preview preserved after failure");
    assert_eq!(preview.books.len(), 4);
    let retry = session.commit();
    assert!(matches!(retry, Err(ReadshelfError::CommitFailed(_))));
}

#[test]
fn test_preview_failure_leaves_session_idle() {
    let mut session = ImportSession::new(MockBackend::failing_preview());

    let result = session.upload(&export_with_rows(2));
    assert!(matches!(result, Err(ReadshelfError::PreviewFailed(_))));
    assert!(session.preview().is_none());

    // Re-upload against the same session is allowed.
    let result = session.upload(&export_with_rows(2));
    assert!(matches!(result, Err(ReadshelfError::PreviewFailed(_))));
}

#[test]
fn test_cancel_then_reupload() {
    let mut session = ImportSession::new(MockBackend::new());
    session.upload(&export_with_rows(3)).unwrap();
    session.cancel();
    assert!(session.preview().is_none());

    let preview = session.upload(&export_with_rows(2)).unwrap();
    assert_eq!(preview.books.len(), 2);
}
