//! CLI application for batch NFS-e validation.

mod commands;

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use commands::{batch, config, process};

/// NFS-e validator - Check service invoices against a reference spreadsheet
#[derive(Parser)]
#[command(name = "nfse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and sort every invoice in the invoice folder
    Run(batch::RunArgs),

    /// Extract a single invoice file
    Process(process::ProcessArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => batch::run(args, cli.config.as_deref(), cli.verbose),
        Commands::Process(args) => {
            init_logging(cli.verbose, None)?;
            process::run(args, cli.config.as_deref())
        }
        Commands::Config(args) => {
            init_logging(cli.verbose, None)?;
            config::run(args, cli.config.as_deref())
        }
    }
}

/// Level written to stderr for a `-v` count.
fn stderr_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Level written to the run log; never quieter than info.
fn file_level(verbose: u8) -> LevelFilter {
    stderr_level(verbose).max(LevelFilter::INFO)
}

/// Install the global subscriber; with `log_file` events are also
/// appended to that file.
pub(crate) fn init_logging(verbose: u8, log_file: Option<&Path>) -> anyhow::Result<()> {
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(stderr_level(verbose));

    let file_layer = match log_file {
        Some(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(file_level(verbose)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
