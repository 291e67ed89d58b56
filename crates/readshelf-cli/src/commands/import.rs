//! Import command - full flow: parse, preview, apply corrections,
//! confirm, commit.

use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;
use readshelf::ImportSession;

use crate::cli::InputFormat;

pub fn run(
    file: PathBuf,
    format: InputFormat,
    api_url: Option<String>,
    isbn_edits: Vec<(usize, String)>,
    enrich: bool,
    yes: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let books = super::load_books(&file, format, enrich, verbose)?;
    let backend = super::backend(api_url)?;
    if verbose {
        eprintln!("backend: {}", backend.base_url());
    }

    let mut session = ImportSession::new(backend);
    session.upload_books(books)?;

    for (index, isbn) in &isbn_edits {
        session.set_isbn(*index, isbn.clone())?;
    }

    let (total, new_count, duplicate_count) = {
        let preview = session
            .preview()
            .ok_or("no preview staged for this import")?;

        println!(
            "{} {}",
            "Importing".cyan().bold(),
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
        println!();

        (
            preview.books.len(),
            preview.new_count,
            preview.duplicate_count,
        )
    };

    if !yes && !confirm(new_count)? {
        session.cancel();
        println!("{}", "Import cancelled.".yellow());
        return Ok(());
    }

    let imported = session.commit()?;

    println!();
    println!(
        "{} imported {} of {} books ({} duplicates left untouched)",
        "Done:".green().bold(),
        imported.to_string().white().bold(),
        total,
        duplicate_count
    );

    Ok(())
}

/// Ask for confirmation on stdin.
fn confirm(new_count: usize) -> Result<bool, Box<dyn std::error::Error>> {
    print!("Import {} new books? [y/N] ", new_count);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}
