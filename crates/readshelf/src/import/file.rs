//! Reading-history files in generic CSV or JSON form.
//!
//! The Goodreads scanner deals with that export's quirks; this module
//! covers well-formed history files produced by other trackers or by hand.
//! CSV is read with a conforming reader, keys bind with flexible casing
//! ("Date Read", "date_read" and "dateRead" are the same field), and the
//! same silent row-skip policy applies: no title or author, no record.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::backend::MetadataLookup;
use crate::error::{ReadshelfError, Result};

use super::record::ImportedBook;

/// Supported history-file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Short name for reporting.
    pub fn label(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
        }
    }
}

/// Infer the format from the file extension.
pub fn infer_format(path: &Path) -> Result<FileFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("csv") => Ok(FileFormat::Csv),
        Some("json") => Ok(FileFormat::Json),
        _ => Err(ReadshelfError::UnsupportedFormat(format!(
            "cannot infer format of '{}'; expected a .csv or .json file",
            path.display()
        ))),
    }
}

/// Provenance for a history file that was read.
#[derive(Debug, Clone, Serialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// Format the file was read as.
    pub format: String,
    /// Number of records that survived parsing.
    pub record_count: usize,
}

/// A raw record before field binding: normalized key → raw value.
type RawRecord = HashMap<String, String>;

/// Reads reading-history files into importable records.
pub struct HistoryReader {
    lookup: Option<Box<dyn MetadataLookup>>,
}

impl HistoryReader {
    /// Create a reader without metadata enrichment.
    pub fn new() -> Self {
        Self { lookup: None }
    }

    /// Enrich records missing title/author from their ISBN.
    pub fn with_lookup(mut self, lookup: impl MetadataLookup + 'static) -> Self {
        self.lookup = Some(Box::new(lookup));
        self
    }

    /// Read a history file, returning the importable records and source
    /// metadata. Records without title and author are dropped silently;
    /// a file with zero valid records is an error.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<(Vec<ImportedBook>, SourceMetadata)> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| ReadshelfError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let format = infer_format(path)?;
        let records = match format {
            FileFormat::Csv => read_csv(&contents)?,
            FileFormat::Json => read_json(&contents)?,
        };

        let books: Vec<ImportedBook> = records
            .into_iter()
            .filter_map(|record| self.finalize(record))
            .collect();

        if books.is_empty() {
            return Err(ReadshelfError::NoValidBooks);
        }

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let metadata = SourceMetadata {
            file: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size_bytes: contents.len() as u64,
            hash: format!("sha256:{:x}", hasher.finalize()),
            format: format.label().to_string(),
            record_count: books.len(),
        };

        Ok((books, metadata))
    }

    /// Bind a raw record to the import fields, enriching from the ISBN when
    /// title/author are missing and a lookup is configured.
    fn finalize(&self, record: RawRecord) -> Option<ImportedBook> {
        let mut title = get(&record, &["title"]);
        let mut author = get(&record, &["author"]);
        let isbn = get(&record, &["isbn"]);

        if (title.is_empty() || author.is_empty()) && !isbn.is_empty() {
            if let Some(lookup) = &self.lookup {
                if let Some(metadata) = lookup.lookup_isbn(&isbn) {
                    if title.is_empty() {
                        title = metadata.title.unwrap_or_default();
                    }
                    if author.is_empty() {
                        author = metadata.author.unwrap_or_default();
                    }
                }
            }
        }

        if title.is_empty() || author.is_empty() {
            return None;
        }

        let rating = get(&record, &["rating", "myrating"])
            .parse::<u8>()
            .unwrap_or(0)
            .min(5);

        Some(ImportedBook {
            title,
            author,
            isbn,
            isbn13: String::new(),
            rating,
            date_read: get(&record, &["dateread", "finishdate"]),
            date_added: get(&record, &["dateadded", "startdate"]),
            shelves: get(&record, &["shelves", "bookshelves", "tags"]),
            review: get(&record, &["review", "myreview", "notes"]),
        })
    }
}

impl Default for HistoryReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a key for binding: alphanumerics only, lowercased.
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Fetch the first matching alias from a record, trimmed.
fn get(record: &RawRecord, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| record.get(*k))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn read_csv(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_key).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let mut record = RawRecord::new();
        for (key, value) in headers.iter().zip(row.iter()) {
            record.insert(key.clone(), value.to_string());
        }
        records.push(record);
    }
    Ok(records)
}

fn read_json(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let unsupported = || {
        ReadshelfError::UnsupportedFormat(
            "JSON must be a list of book objects or contain a 'books' list".to_string(),
        )
    };

    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("books") {
            Some(serde_json::Value::Array(items)) => items,
            _ => return Err(unsupported()),
        },
        _ => return Err(unsupported()),
    };

    let mut records = Vec::new();
    for item in items {
        let serde_json::Value::Object(object) = item else {
            continue;
        };
        let mut record = RawRecord::new();
        for (key, value) in object {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => continue,
            };
            record.insert(normalize_key(&key), text);
        }
        records.push(record);
    }
    Ok(records)
}
