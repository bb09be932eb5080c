//! Concepts CLI - command-line driver for hierarchical concept experiments
//!
//! This CLI lets researchers:
//! - Run a full experiment (generate, mix, discover structure, infer
//!   weights, export and check) and print or save the results bundle
//! - Export Lean sources for every concept of a seeded run

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod bundle;
mod commands;
pub mod config;
pub mod data;
mod error;
pub mod experiment;
mod output;

use commands::{export, run};
pub use config::ExperimentConfig;
pub use error::{CliError, CliResult};
pub use experiment::Experiment;
pub use output::OutputFormat;

/// Concepts CLI application
#[derive(Parser)]
#[command(name = "concepts")]
#[command(about = "Hierarchical concept invention experiments", long_about = None)]
#[command(version)]
struct Cli {
    /// Experiment config file (YAML or JSON)
    #[arg(short, long, env = "CONCEPTS_CONFIG")]
    config: Option<PathBuf>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run the full experiment and report the results bundle
    Run(run::RunArgs),

    /// Emit Lean source for every concept of a seeded run
    Export(export::ExportArgs),
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => {
            e.print()?;
            return Ok(());
        }
        Err(e) => return Err(CliError::InvalidArgument(e.to_string())),
    };

    init_tracing(cli.verbose);

    let config = ExperimentConfig::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Run(args) => run::execute(args, config, cli.output),
        Commands::Export(args) => export::execute(args, config, cli.output),
    }
}

/// Install the global subscriber; later calls keep the first one.
fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .try_init();
}
