//! The normalized unit of import.

use serde::{Deserialize, Serialize};

/// A single book record parsed from a reading-history export.
///
/// Title and author are required; everything else defaults to empty/zero.
/// Dates are carried as opaque strings — the backend decides how (and
/// whether) to interpret them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    /// Goodreads does not reliably separate ISBN13 from ISBN, so this is
    /// always empty after parsing. Kept for wire compatibility.
    #[serde(default)]
    pub isbn13: String,
    /// The user's own rating, 0-5. 0 means unrated.
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub date_read: String,
    #[serde(default)]
    pub date_added: String,
    #[serde(default)]
    pub shelves: String,
    #[serde(default)]
    pub review: String,
}

impl ImportedBook {
    /// Create a record with the two required fields.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    /// Set the ISBN.
    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = isbn.into();
        self
    }

    /// Set the rating.
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = rating;
        self
    }
}

/// Why a row was dropped during parsing.
///
/// Skips are never surfaced individually; only the aggregate record count
/// reflects the loss. The reason exists so the skip policy itself stays
/// testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The line was empty or whitespace.
    Blank,
    /// The row had fewer fields than the highest required column.
    TooFewFields,
    /// Title was empty after cleaning.
    MissingTitle,
    /// Author was empty after cleaning.
    MissingAuthor,
}
