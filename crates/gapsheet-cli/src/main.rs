//! Gapsheet CLI - missing-value analysis for spreadsheet workbooks.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Exit;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Sheets { file, json } => commands::sheets::run(file, json).map(|_| Exit::Success),

        Commands::Analyze {
            file,
            config,
            mapping,
            columns,
            output,
            no_reports,
            full,
            na_tokens,
            json,
        } => commands::analyze::run(commands::analyze::AnalyzeArgs {
            file,
            config,
            mapping,
            columns,
            output,
            no_reports,
            full,
            na_tokens,
            json,
            verbose: cli.verbose,
        }),
    };

    match result {
        Ok(exit) => std::process::exit(exit.code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
