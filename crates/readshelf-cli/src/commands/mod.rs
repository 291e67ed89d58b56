//! CLI command implementations.

pub mod import;
pub mod inspect;
pub mod preview;

use std::fs;
use std::path::Path;

use colored::Colorize;
use readshelf::{
    HistoryReader, HttpBackend, ImportedBook, OpenLibraryLookup, REVIEW_LIMIT, parse_export,
};

use crate::cli::InputFormat;

/// Read and parse an export file in the requested format.
pub fn load_books(
    file: &Path,
    format: InputFormat,
    enrich: bool,
    verbose: bool,
) -> Result<Vec<ImportedBook>, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    match format {
        InputFormat::Goodreads => {
            let text = fs::read_to_string(file)?;
            Ok(parse_export(&text)?)
        }
        InputFormat::Csv | InputFormat::Json => {
            let mut reader = HistoryReader::new();
            if enrich {
                reader = reader.with_lookup(OpenLibraryLookup::new()?);
            }
            let (books, source) = reader.read_file(file)?;
            if verbose {
                eprintln!(
                    "source: {} ({} bytes, {})",
                    source.file, source.size_bytes, source.hash
                );
            }
            Ok(books)
        }
    }
}

/// Build the backend client from the flag or the environment.
pub fn backend(api_url: Option<String>) -> Result<HttpBackend, Box<dyn std::error::Error>> {
    Ok(match api_url {
        Some(url) => HttpBackend::with_base_url(url)?,
        None => HttpBackend::new()?,
    })
}

/// Print records the way the review screen shows them: at most the first
/// ten, with a trailer for the rest.
pub fn print_records(books: &[ImportedBook]) {
    let shown = &books[..books.len().min(REVIEW_LIMIT)];
    for (i, book) in shown.iter().enumerate() {
        let rating = if book.rating > 0 {
            format!("  {} {}", "★".yellow(), book.rating)
        } else {
            String::new()
        };
        println!("  {:2}. {}{}", i, book.title.white().bold(), rating);
        println!("      by {}", book.author);
        if !book.isbn.is_empty() {
            println!("      ISBN: {}", book.isbn.green());
        }
    }
    if books.len() > shown.len() {
        println!("  ... and {} more books", books.len() - shown.len());
    }
}
