//! Stevedore CLI - resolves and stages pre-built native SDK dependencies

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stevedore::util::diagnostic::ManifestParseError;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Globals;

fn main() {
    if let Err(e) = run() {
        // Manifest parse errors carry a source span; render them through
        // miette so the offending TOML is shown inline.
        match e.downcast::<ManifestParseError>() {
            Ok(parse) => eprint!("{:?}", miette::Report::new(parse)),
            Err(e) => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("stevedore=debug")
    } else {
        EnvFilter::new("stevedore=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let globals = Globals::from_cli(&cli)?;

    // Execute command
    match &cli.command {
        Commands::Plan(args) => commands::plan::execute(&globals, args),
        Commands::Stage(args) => commands::stage::execute(&globals, args),
        Commands::Check(args) => commands::check::execute(&globals, args),
        Commands::Platforms(args) => commands::platforms::execute(&globals, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
