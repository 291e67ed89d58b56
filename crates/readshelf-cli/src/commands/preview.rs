//! Preview command - classify an export against the backend without
//! committing anything.

use std::path::PathBuf;

use colored::Colorize;
use readshelf::ImportSession;

use crate::cli::InputFormat;

pub fn run(
    file: PathBuf,
    format: InputFormat,
    api_url: Option<String>,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let books = super::load_books(&file, format, false, verbose)?;
    let backend = super::backend(api_url)?;
    if verbose {
        eprintln!("backend: {}", backend.base_url());
    }

    let mut session = ImportSession::new(backend);
    let preview = session.upload_books(books)?;

    if json {
        println!("{}", serde_json::to_string_pretty(preview)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Previewing".cyan().bold(),
        file.display().to_string().white()
    );
    println!(
        "{} books total: {} new, {} already in library",
        preview.books.len().to_string().white().bold(),
        preview.new_count.to_string().green(),
        preview.duplicate_count.to_string().yellow()
    );
    println!();
    super::print_records(&preview.books);

    Ok(())
}
