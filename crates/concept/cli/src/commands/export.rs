//! `concepts export`: Lean source for every concept of a seeded run

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use tracing::info;

use concept_model::{seeded_rng, ConceptModel};
use concept_symbolic::{batch_verify_concepts, LeanExporter, RecordingChecker};

use crate::config::ExperimentConfig;
use crate::data::load_data;
use crate::error::CliResult;
use crate::output::{print_success, render, OutputFormat};

/// Arguments of `concepts export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Random seed for the model run
    #[arg(short, long, default_value = "0")]
    pub seed: u64,

    /// Number of concept levels (overrides the config file)
    #[arg(short, long)]
    pub levels: Option<usize>,

    /// Data file of whitespace/comma separated reals
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Simplify expressions before translating them
    #[arg(long)]
    pub simplify: bool,

    /// Write one `<concept>.lean` file per concept into this directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

/// Execute `concepts export`
pub fn execute(args: ExportArgs, config: ExperimentConfig, format: OutputFormat) -> CliResult<()> {
    let config = config.with_levels(args.levels);
    config.validate()?;
    let input = load_data(args.data.as_deref(), &config.input)?;
    let model = ConceptModel::new(config.model)?;
    let run = model.run(&input, &mut seeded_rng(args.seed))?;

    let exporter = LeanExporter::new(args.simplify);
    let results = batch_verify_concepts(&run.population.flatten(), &exporter, &RecordingChecker)?;

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)?;
        for result in &results {
            std::fs::write(dir.join(format!("{}.lean", result.concept)), &result.lean_source)?;
        }
        info!(dir = %dir.display(), files = results.len(), "lean sources written");
    }

    match render(&results, format)? {
        Some(text) => println!("{}", text),
        None => {
            for result in &results {
                println!("{}", format!("-- {}", result.concept).bold().cyan());
                println!("{}", result.lean_source);
                println!();
            }
            if let Some(dir) = &args.out_dir {
                print_success(&format!(
                    "{} sources written to {}",
                    results.len(),
                    dir.display()
                ));
            }
        }
    }
    Ok(())
}
