//! Inspect command - parse an export offline and summarize it.

use std::path::PathBuf;

use colored::Colorize;

use crate::cli::InputFormat;

pub fn run(
    file: PathBuf,
    format: InputFormat,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let books = super::load_books(&file, format, false, verbose)?;

    if json {
        let summary = serde_json::json!({
            "file": file.display().to_string(),
            "format": format.to_string(),
            "total": books.len(),
            "books": books,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {} ({} format)",
        "Parsed".cyan().bold(),
        file.display().to_string().white(),
        format
    );
    println!(
        "{} importable books",
        books.len().to_string().white().bold()
    );
    println!();
    super::print_records(&books);

    Ok(())
}
