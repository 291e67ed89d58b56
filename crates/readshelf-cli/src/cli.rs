//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Readshelf: reading-history importer for a personal book tracker
#[derive(Parser)]
#[command(name = "readshelf")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse an export offline and show what would be imported
    Inspect {
        /// Path to the export file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Input format
        #[arg(short, long, default_value = "goodreads")]
        format: InputFormat,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Preview an import against the backend without committing
    Preview {
        /// Path to the export file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Input format
        #[arg(short, long, default_value = "goodreads")]
        format: InputFormat,

        /// Backend base URL (defaults to READSHELF_API_URL)
        #[arg(long)]
        api_url: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import an export into the library
    Import {
        /// Path to the export file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Input format
        #[arg(short, long, default_value = "goodreads")]
        format: InputFormat,

        /// Backend base URL (defaults to READSHELF_API_URL)
        #[arg(long)]
        api_url: Option<String>,

        /// Correct an ISBN before committing, as INDEX=ISBN (repeatable)
        #[arg(long = "isbn", value_name = "INDEX=ISBN", value_parser = parse_isbn_edit)]
        isbn_edits: Vec<(usize, String)>,

        /// Fill missing title/author from Open Library (csv/json formats)
        #[arg(long)]
        enrich: bool,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Input format choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputFormat {
    /// Goodreads CSV export (crude quoting, columns located by header name)
    #[default]
    Goodreads,
    /// Well-formed CSV history file
    Csv,
    /// JSON history file (list of books, or {"books": [...]})
    Json,
}

impl std::str::FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "goodreads" => Ok(InputFormat::Goodreads),
            "csv" => Ok(InputFormat::Csv),
            "json" => Ok(InputFormat::Json),
            _ => Err(format!(
                "Unknown format: {}. Use goodreads, csv, or json.",
                s
            )),
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Goodreads => write!(f, "goodreads"),
            InputFormat::Csv => write!(f, "csv"),
            InputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse an `INDEX=ISBN` correction.
fn parse_isbn_edit(s: &str) -> Result<(usize, String), String> {
    let (index, isbn) = s
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=ISBN, got '{}'", s))?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| format!("invalid book index '{}'", index))?;
    Ok((index, isbn.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_isbn_edit() {
        assert_eq!(
            parse_isbn_edit("3=9780441013593"),
            Ok((3, "9780441013593".to_string()))
        );
        assert!(parse_isbn_edit("no-equals").is_err());
        assert!(parse_isbn_edit("x=123").is_err());
    }

    #[test]
    fn test_input_format_round_trip() {
        for format in [InputFormat::Goodreads, InputFormat::Csv, InputFormat::Json] {
            assert_eq!(format.to_string().parse::<InputFormat>(), Ok(format));
        }
        assert!("parquet".parse::<InputFormat>().is_err());
    }
}
