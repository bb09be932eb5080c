//! `concepts run`: the full experiment

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use concept_inference::most_important;
use concept_symbolic::ProofOutcome;

use crate::bundle::ResultsBundle;
use crate::config::ExperimentConfig;
use crate::data::load_data;
use crate::error::CliResult;
use crate::experiment::Experiment;
use crate::output::{print_heading, print_success, print_warning, render, OutputFormat};

/// Arguments of `concepts run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Random seed for the whole run
    #[arg(short, long, default_value = "0")]
    pub seed: u64,

    /// Number of concept levels (overrides the config file)
    #[arg(short, long)]
    pub levels: Option<usize>,

    /// Data file of whitespace/comma separated reals
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Also write the results bundle as JSON to this path
    #[arg(long)]
    pub save: Option<PathBuf>,
}

/// Execute `concepts run`
pub fn execute(args: RunArgs, config: ExperimentConfig, format: OutputFormat) -> CliResult<()> {
    let config = config.with_levels(args.levels);
    let input = load_data(args.data.as_deref(), &config.input)?;
    let bundle = Experiment::new(config)?.run(&input, args.seed)?;

    if let Some(path) = &args.save {
        std::fs::write(path, serde_json::to_string_pretty(&bundle)?)?;
    }

    match render(&bundle, format)? {
        Some(text) => println!("{}", text),
        None => print_table(&bundle),
    }
    if let Some(path) = &args.save {
        if matches!(format, OutputFormat::Table) {
            print_success(&format!("Results written to {}", path.display()));
        }
    }
    Ok(())
}

fn print_table(bundle: &ResultsBundle) {
    println!(
        "{} {}  seed {}  {}",
        "Run".bold(),
        bundle.run_id.to_string().dimmed(),
        bundle.seed,
        bundle.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    print_heading("Concept Population");
    for (i, (concept, verification)) in bundle
        .population
        .iter()
        .zip(&bundle.verifications)
        .enumerate()
    {
        let weight = bundle.weights.get(i).unwrap_or(0.0);
        let posterior = bundle
            .importance
            .get(i)
            .map(|c| format!("{:.3}", c.weight))
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<28} w={:.3} post={}",
            concept.to_string().bold(),
            weight,
            posterior
        );
        println!("      {}", verification.expression.dimmed());
    }

    if let Some(structure) = &bundle.structure {
        print_heading(&format!(
            "Structure ({} linkage, threshold {})",
            structure.method, structure.threshold
        ));
        for cluster in structure.hierarchy.keys() {
            let members: Vec<String> = structure
                .members(*cluster)
                .iter()
                .map(ToString::to_string)
                .collect();
            println!(
                "  {} {}",
                format!("cluster {}", cluster).bold().yellow(),
                members.join(", ")
            );
        }
    }

    if let Some(posterior) = &bundle.posterior {
        print_heading("Posterior");
        println!(
            "  effective sample size {:.1}",
            posterior.effective_sample_size
        );
        if let Some(top) = most_important(&bundle.importance) {
            println!(
                "  most important {} (mean weight {:.3})",
                top.concept.to_string().bold(),
                top.weight
            );
        }
        for (summary, importance) in posterior.concepts.iter().zip(&bundle.importance) {
            println!(
                "  {:<8} mean {:.3}  std {:.3}  90% [{:.3}, {:.3}]",
                importance.concept.to_string(),
                summary.mean,
                summary.std,
                summary.q05,
                summary.q95
            );
        }
    }

    if !bundle.theorems.is_empty() {
        print_heading("Theorems");
        for check in &bundle.theorems {
            let verdict = match &check.outcome {
                ProofOutcome::Proved => "proved".green(),
                ProofOutcome::Plausible { .. } => "plausible".yellow(),
                ProofOutcome::Refuted { .. } => "refuted".red(),
            };
            println!("  {} {}", verdict, check.claim);
        }
    }

    if !bundle.rankings.is_empty() {
        print_heading("Ranking (MSE + complexity)");
        for (rank, ranked) in bundle.rankings.iter().take(5).enumerate() {
            println!(
                "  {} {:<8} {:>10.4}  {}",
                format!("#{}", rank + 1).bold().yellow(),
                ranked.concept.to_string(),
                ranked.score,
                ranked.expression.dimmed()
            );
        }
    }

    println!();
    println!(
        "{}: {} patterns among concept pairs",
        "Note".bold(),
        bundle.patterns.len()
    );
    for reason in &bundle.skipped {
        print_warning(&format!("skipped {}", reason));
    }
}
