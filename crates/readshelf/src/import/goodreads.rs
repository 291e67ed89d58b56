//! Goodreads CSV export parser.
//!
//! Goodreads library exports are loosely structured: column order varies
//! between exports, quoting is inconsistent, and ISBN13 shares a field with
//! ISBN. The scanner here deliberately reproduces the export's quirks instead
//! of delegating to a conforming CSV reader: quote characters ride through
//! tokenization and are stripped crudely during field cleanup, and malformed
//! quoting shifts field boundaries rather than failing the row.

use crate::error::{ReadshelfError, Result};

use super::record::{ImportedBook, SkipReason};

/// Split one record line into fields, honoring quoted commas.
///
/// Each `"` toggles comma handling and is kept in the output; residual
/// quotes are stripped later by field cleanup. An unmatched quote does not
/// fail — it only shifts subsequent field boundaries (accepted limitation
/// of the export format). `""` is not unescaped.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Strip residual quote characters and surrounding whitespace.
fn clean(field: &str) -> String {
    field.replace('"', "").trim().to_string()
}

/// Read a field through a possibly-unresolved column index.
fn field_at(fields: &[String], index: Option<usize>) -> String {
    index
        .and_then(|i| fields.get(i))
        .map(|f| clean(f))
        .unwrap_or_default()
}

/// Column positions for the logical Goodreads fields, located by
/// case-insensitive substring match against the cleaned header cells.
///
/// A field whose header cannot be matched stays unresolved; reads through
/// an unresolved index default to empty.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    pub title: Option<usize>,
    pub author: Option<usize>,
    pub isbn: Option<usize>,
    pub rating: Option<usize>,
    pub date_read: Option<usize>,
    pub date_added: Option<usize>,
    pub shelves: Option<usize>,
    pub review: Option<usize>,
}

impl HeaderIndex {
    /// Locate the logical fields in a tokenized header row.
    pub fn from_header(cells: &[String]) -> Self {
        let lowered: Vec<String> = cells.iter().map(|c| clean(c).to_lowercase()).collect();
        let find = |needle: &str| lowered.iter().position(|h| h.contains(needle));

        Self {
            title: find("title"),
            author: find("author"),
            isbn: find("isbn"),
            // Goodreads exports both "My Rating" and "Average Rating";
            // only the user's own rating is wanted.
            rating: lowered
                .iter()
                .position(|h| h.contains("rating") && !h.contains("average")),
            date_read: find("date read"),
            date_added: find("date added"),
            shelves: find("shelves"),
            review: find("review"),
        }
    }

    /// Minimum field count a row needs before the required columns
    /// (title, author) can be read at all.
    fn required_width(&self) -> usize {
        let title = self.title.map(|i| i + 1).unwrap_or(0);
        let author = self.author.map(|i| i + 1).unwrap_or(0);
        title.max(author)
    }
}

/// Parse a whole Goodreads CSV export into importable book records.
///
/// Line 0 is the header. Rows that cannot become a valid record are dropped
/// silently; only the surviving records are returned, in file order. Fails
/// only when the entire input yields zero valid rows.
pub fn parse_export(text: &str) -> Result<Vec<ImportedBook>> {
    let mut lines = text.lines();
    let header = match lines.next() {
        Some(header) => header,
        None => return Err(ReadshelfError::NoValidBooks),
    };
    let index = HeaderIndex::from_header(&split_fields(header));

    let books: Vec<ImportedBook> = lines
        .filter_map(|line| parse_row(line, &index).ok())
        .collect();

    if books.is_empty() {
        return Err(ReadshelfError::NoValidBooks);
    }
    Ok(books)
}

/// Parse a single data row.
///
/// The skip policy lives here, as an explicit per-row result, so it can be
/// tested in isolation even though callers only see surviving records.
fn parse_row(line: &str, index: &HeaderIndex) -> std::result::Result<ImportedBook, SkipReason> {
    let line = line.trim();
    if line.is_empty() {
        return Err(SkipReason::Blank);
    }

    let fields = split_fields(line);
    if fields.len() < index.required_width() {
        return Err(SkipReason::TooFewFields);
    }

    let title = field_at(&fields, index.title);
    if title.is_empty() {
        return Err(SkipReason::MissingTitle);
    }
    let author = field_at(&fields, index.author);
    if author.is_empty() {
        return Err(SkipReason::MissingAuthor);
    }

    let rating = field_at(&fields, index.rating)
        .parse::<u8>()
        .unwrap_or(0)
        .min(5);

    Ok(ImportedBook {
        title,
        author,
        isbn: field_at(&fields, index.isbn),
        // The export does not reliably separate ISBN13 from ISBN.
        isbn13: String::new(),
        rating,
        date_read: field_at(&fields, index.date_read),
        date_added: field_at(&fields, index.date_added),
        shelves: field_at(&fields, index.shelves),
        review: field_at(&fields, index.review),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_fields() {
        assert_eq!(split_fields("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_keeps_quoted_commas() {
        assert_eq!(split_fields(r#"a,"b,c",d"#), vec!["a", "\"b,c\"", "d"]);
    }

    #[test]
    fn test_split_emits_terminal_field_without_trailing_comma() {
        assert_eq!(split_fields("a,b"), vec!["a", "b"]);
        assert_eq!(split_fields("a,"), vec!["a", ""]);
        assert_eq!(split_fields(""), vec![""]);
    }

    #[test]
    fn test_split_unmatched_quote_shifts_boundaries() {
        // The rest of the line is swallowed into one field; no error.
        assert_eq!(split_fields(r#"a,"b,c"#), vec!["a", "\"b,c"]);
    }

    #[test]
    fn test_header_match_is_case_insensitive_substring() {
        let cells = split_fields(r#""Book Title","Author Name","My Rating","Average Rating""#);
        let index = HeaderIndex::from_header(&cells);

        assert_eq!(index.title, Some(0));
        assert_eq!(index.author, Some(1));
        assert_eq!(index.rating, Some(2));
    }

    #[test]
    fn test_header_unmatched_field_stays_unresolved() {
        let cells = split_fields("Title,Author");
        let index = HeaderIndex::from_header(&cells);

        assert_eq!(index.isbn, None);
        assert_eq!(index.review, None);
        assert_eq!(index.required_width(), 2);
    }

    #[test]
    fn test_parse_row_skip_reasons() {
        let index = HeaderIndex::from_header(&split_fields("Title,Author,My Rating"));

        assert_eq!(parse_row("   ", &index), Err(SkipReason::Blank));
        assert_eq!(parse_row("only-title", &index), Err(SkipReason::TooFewFields));
        assert_eq!(parse_row(",Someone,5", &index), Err(SkipReason::MissingTitle));
        assert_eq!(parse_row("Dune,,5", &index), Err(SkipReason::MissingAuthor));
    }

    #[test]
    fn test_parse_row_rating_best_effort() {
        let index = HeaderIndex::from_header(&split_fields("Title,Author,My Rating"));

        let book = parse_row("Dune,Frank Herbert,notanumber", &index).unwrap();
        assert_eq!(book.rating, 0);

        let book = parse_row("Dune,Frank Herbert,", &index).unwrap();
        assert_eq!(book.rating, 0);
    }

    #[test]
    fn test_rating_binds_my_rating_not_average() {
        let text = "\"Book Title\",\"Author Name\",\"My Rating\",\"Average Rating\"\n\
                    Dune,Frank Herbert,5,4.2\n";
        let books = parse_export(text).unwrap();

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].rating, 5);
    }

    #[test]
    fn test_parse_export_end_to_end_row() {
        let text = "Title,Author,ISBN,My Rating,Date Read,Date Added,Bookshelves,My Review\n\
                    \"Dune\",\"Frank Herbert\",\"9780441013593\",5,2023/01/02,2022/12/20,read,\"Great book, loved it\"\n";
        let books = parse_export(text).unwrap();

        assert_eq!(
            books,
            vec![ImportedBook {
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                isbn: "9780441013593".to_string(),
                isbn13: String::new(),
                rating: 5,
                date_read: "2023/01/02".to_string(),
                date_added: "2022/12/20".to_string(),
                shelves: "read".to_string(),
                review: "Great book, loved it".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_export_drops_invalid_rows_silently() {
        let text = "Title,Author,My Rating\n\
                    ,Someone,5\n\
                    \n\
                    Dune,Frank Herbert,5\n";
        let books = parse_export(text).unwrap();

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
    }

    #[test]
    fn test_parse_export_zero_valid_rows_is_an_error() {
        let result = parse_export("Title,Author,My Rating\n,Someone,5\n");
        assert!(matches!(result, Err(ReadshelfError::NoValidBooks)));

        let result = parse_export("");
        assert!(matches!(result, Err(ReadshelfError::NoValidBooks)));
    }

    #[test]
    fn test_parse_export_isbn13_always_empty() {
        let text = "Title,Author,ISBN,ISBN13\nDune,Frank Herbert,123,978123\n";
        let books = parse_export(text).unwrap();

        // The first column containing "isbn" wins; isbn13 is never split out.
        assert_eq!(books[0].isbn, "123");
        assert!(books[0].isbn13.is_empty());
    }
}
