pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "carmatch",
    about = "CarMatch operator CLI",
    long_about = "Apply migrations, check runtime readiness, inspect configuration and the car catalog.",
    after_help = "Examples:\n  carmatch doctor --json\n  carmatch config\n  carmatch catalog --path data/cars.csv"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, model and places readiness, catalog and DB connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Parse the car catalog CSV and summarize its contents")]
    Catalog {
        #[arg(long, help = "Catalog file to read instead of catalog.csv_path")]
        path: Option<PathBuf>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Catalog { path } => commands::catalog::run(path),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
