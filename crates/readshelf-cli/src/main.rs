//! Readshelf CLI - reading-history importer for a personal book tracker.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { file, format, json } => {
            commands::inspect::run(file, format, json, cli.verbose)
        }

        Commands::Preview {
            file,
            format,
            api_url,
            json,
        } => commands::preview::run(file, format, api_url, json, cli.verbose),

        Commands::Import {
            file,
            format,
            api_url,
            isbn_edits,
            enrich,
            yes,
        } => commands::import::run(file, format, api_url, isbn_edits, enrich, yes, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
