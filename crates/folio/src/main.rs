//! Folio CLI - static documentation site generator.
//!
//! Provides commands for:
//! - `generate`: Render the site into its output directory
//! - `serve`: Serve the site locally and rebuild on change

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{GenerateArgs, ServeArgs};
use error::CliError;
use output::Output;

/// Folio - static documentation site generator.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about, disable_version_flag = true)]
struct Cli {
    /// Enable debug logging.
    #[arg(
        short = 'V',
        long,
        global = true,
        env = "FOLIO_DEBUG",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    verbose: bool,

    /// Print version.
    #[arg(long, action = ArgAction::Version)]
    version: Option<bool>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the site into its output directory.
    #[command(visible_alias = "g")]
    Generate(GenerateArgs),
    /// Serve the site locally and reload browsers on change.
    #[command(visible_alias = "s")]
    Serve(ServeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Generate(args) => args.execute(),
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(args.execute())
        }
    }
}
