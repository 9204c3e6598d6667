//! archivefile CLI - Command-line utility for building reproducible zip and
//! tar.gz archives.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod progress;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    logging::init(cli.verbose);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    let (operation, result) = match &cli.command {
        cli::Commands::Create(args) => (
            "create",
            commands::create::execute(args, &*formatter, !cli.quiet && !cli.json),
        ),
        cli::Commands::Formats => ("formats", commands::formats::execute(&*formatter)),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            ("completion", Ok(()))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(operation, error = %err, "command failed");
            formatter.format_error(operation, &err);
            ExitCode::FAILURE
        }
    }
}
