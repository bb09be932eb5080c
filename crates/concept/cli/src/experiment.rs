//! The end-to-end experiment: generate, mix, discover, infer, export.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use concept_inference::{infer_concept_importance, ImportanceSampler, InferenceError, PosteriorApproximation};
use concept_model::{seeded_rng, ConceptModel};
use concept_structure::{StructureDiscovery, StructureReport, StructureResult};
use concept_symbolic::{
    batch_verify_concepts, concept_expression, discover_patterns, rank_concepts, LeanExporter,
    RecordingChecker, SampleOracle, TheoremGenerator, TheoremOracle,
};
use concept_types::{Concept, Tensor};

use crate::bundle::{ResultsBundle, TheoremCheck};
use crate::config::ExperimentConfig;
use crate::error::CliResult;

/// A configured experiment, ready to run on any input.
pub struct Experiment {
    config: ExperimentConfig,
    model: ConceptModel,
    discovery: StructureDiscovery,
    sampler: ImportanceSampler,
    oracle: SampleOracle,
}

impl Experiment {
    pub fn new(config: ExperimentConfig) -> CliResult<Self> {
        config.validate()?;
        Ok(Self {
            model: ConceptModel::new(config.model.clone())?,
            discovery: StructureDiscovery::new(config.structure.clone())?,
            sampler: ImportanceSampler::new(config.sampler.clone())?,
            oracle: SampleOracle::new(config.oracle.clone())?,
            config,
        })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Run every stage with one RNG seeded from `seed`.
    ///
    /// Structure discovery and posterior inference are skipped, not failed,
    /// when the drawn population is too small or degenerate for them.
    pub fn run(&self, input: &Tensor, seed: u64) -> CliResult<ResultsBundle> {
        let mut rng = seeded_rng(seed);
        let run = self.model.run(input, &mut rng)?;
        let concepts = run.population.flatten();
        let mut skipped = Vec::new();

        let structure = skip_degenerate(
            self.discovery.discover(&concepts, run.observation.data()),
            &mut skipped,
        )?;

        let posterior = match self
            .sampler
            .fit(&concepts, input, &run.observation, &mut rng)
        {
            Ok(posterior) => Some(posterior),
            Err(InferenceError::NoConcepts) => {
                skipped.push("posterior: population is empty".to_string());
                None
            }
            Err(e) => return Err(e.into()),
        };
        let (statistics, importance) = match &posterior {
            Some(p) => (
                Some(p.statistics()?),
                infer_concept_importance(p, &concepts)?,
            ),
            None => (None, Vec::new()),
        };

        let verifications =
            batch_verify_concepts(&concepts, &LeanExporter::default(), &RecordingChecker)?;
        let theorems = self.check_theorems(&concepts, &mut rng, &mut skipped)?;
        let exprs: Vec<_> = concepts.iter().map(|c| concept_expression(c)).collect();
        let patterns = discover_patterns(&exprs)
            .iter()
            .map(ToString::to_string)
            .collect();
        let rankings = rank_concepts(&concepts, input.data())?;

        for reason in &skipped {
            warn!(seed, reason = %reason, "stage skipped");
        }
        let bundle = ResultsBundle {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            seed,
            config: self.config.clone(),
            population: run.population,
            weights: run.weights,
            observation: run.observation,
            structure,
            posterior: statistics,
            importance,
            verifications,
            theorems,
            patterns,
            rankings,
            skipped,
        };
        info!(
            run_id = %bundle.run_id,
            concepts = bundle.num_concepts(),
            clusters = bundle.structure.as_ref().map(|s| s.num_clusters()),
            theorems = bundle.theorems.len(),
            refuted = bundle.refuted_theorems(),
            "experiment finished"
        );
        Ok(bundle)
    }

    fn check_theorems(
        &self,
        concepts: &[Arc<Concept>],
        rng: &mut dyn rand::RngCore,
        skipped: &mut Vec<String>,
    ) -> CliResult<Vec<TheoremCheck>> {
        if concepts.is_empty() {
            skipped.push("theorems: population is empty".to_string());
            return Ok(Vec::new());
        }
        let generator = TheoremGenerator::new(self.config.theorems.max_terms);
        generator
            .random_theorems(concepts, self.config.theorems.count, rng)?
            .into_iter()
            .map(|theorem| {
                Ok(TheoremCheck {
                    outcome: self.oracle.prove(&theorem, &[])?,
                    claim: theorem.to_string(),
                })
            })
            .collect()
    }
}

/// Keep a report, record a degenerate population as skipped, and fail on
/// anything else.
fn skip_degenerate(
    result: StructureResult<StructureReport>,
    skipped: &mut Vec<String>,
) -> CliResult<Option<StructureReport>> {
    match result {
        Ok(report) => Ok(Some(report)),
        Err(e) if e.is_degenerate() => {
            skipped.push(format!("structure discovery: {}", e));
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use concept_model::{CountSpec, ModelConfig};

    fn small_config() -> ExperimentConfig {
        let mut config = ExperimentConfig::default();
        config.model = ModelConfig {
            num_levels: 2,
            concept_count: CountSpec::fixed(3),
            component_count: CountSpec::fixed(2),
            ..ModelConfig::default()
        };
        config.sampler.num_samples = 50;
        config
    }

    #[test]
    fn same_seed_same_results() {
        let experiment = Experiment::new(small_config()).unwrap();
        let input = Tensor::linspace(-1.0, -0.5, 30);
        let a = experiment.run(&input, 11).unwrap();
        let b = experiment.run(&input, 11).unwrap();
        assert_eq!(a.num_concepts(), 6);
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.observation, b.observation);
        assert_eq!(
            serde_json::to_string(&a.population).unwrap(),
            serde_json::to_string(&b.population).unwrap()
        );
        assert_eq!(a.verifications.len(), 6);
        assert_eq!(a.rankings.len(), 6);
        assert_eq!(a.theorems.len(), 5);
        assert!(a.theorems.iter().all(|t| !t.outcome.is_refuted()));
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn empty_population_skips_dependent_stages() {
        let mut config = small_config();
        config.model.concept_count = CountSpec::fixed(0);
        let bundle = Experiment::new(config)
            .unwrap()
            .run(&Tensor::linspace(-1.0, 1.0, 10), 0)
            .unwrap();
        assert_eq!(bundle.num_concepts(), 0);
        assert!(bundle.structure.is_none());
        assert!(bundle.posterior.is_none());
        assert!(bundle.theorems.is_empty());
        assert_eq!(bundle.skipped.len(), 3);
    }

    #[test]
    fn only_degenerate_structure_is_skipped() {
        use concept_structure::StructureError;
        use concept_types::ConceptId;

        let mut skipped = Vec::new();
        let undefined = skip_degenerate(
            Err(StructureError::CorrelationUndefined {
                concepts: 1,
                observations: 10,
            }),
            &mut skipped,
        )
        .unwrap();
        assert!(undefined.is_none());
        assert_eq!(skipped.len(), 1);

        let overflow = skip_degenerate(
            Err(StructureError::NonFinite {
                concept: ConceptId::new(1, 0),
                observation: 3,
                value: f64::INFINITY,
            }),
            &mut skipped,
        );
        assert!(matches!(
            overflow,
            Err(CliError::Structure(StructureError::NonFinite { .. }))
        ));
        assert_eq!(skipped.len(), 1);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = small_config();
        config.sampler.num_samples = 0;
        assert!(Experiment::new(config).is_err());
    }
}
