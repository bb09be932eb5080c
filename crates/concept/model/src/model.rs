//! Model driver: levels first, then the observation.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use concept_types::{Concept, ConceptPopulation, InvariantChecker, Tensor, WeightVector};

use crate::composer::HierarchicalComposer;
use crate::config::ModelConfig;
use crate::error::ModelResult;
use crate::generator::{LevelGenerator, PrimitiveGenerator};
use crate::mixer::{MixOutput, ObservationMixer};

/// Everything one generative run produces.
#[derive(Clone, Debug, Serialize)]
pub struct ModelRun {
    pub population: ConceptPopulation,
    pub weights: WeightVector,
    pub observation: Tensor,
}

/// Seeded RNG used for reproducible runs.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// The hierarchical generative model.
#[derive(Clone, Debug)]
pub struct ConceptModel {
    config: ModelConfig,
    primitives: PrimitiveGenerator,
    composer: HierarchicalComposer,
    mixer: ObservationMixer,
}

impl ConceptModel {
    /// Build a model after validating `config`.
    pub fn new(config: ModelConfig) -> ModelResult<Self> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "rejecting model configuration");
            return Err(e);
        }
        Ok(Self {
            primitives: PrimitiveGenerator::new(config.concept_count.clone()),
            composer: HierarchicalComposer::new(
                config.concept_count.clone(),
                config.component_count.clone(),
                config.zero_component_policy.clone(),
            ),
            mixer: ObservationMixer::new(config.noise_std),
            config,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Generate the concepts of `level` on top of `population`.
    ///
    /// Level 0 goes to the primitive generator, every other level to the
    /// composer. The population is not modified.
    pub fn generate_level_concepts(
        &self,
        level: usize,
        population: &ConceptPopulation,
        rng: &mut dyn RngCore,
    ) -> ModelResult<Vec<Concept>> {
        let generator: &dyn LevelGenerator = if level == 0 {
            &self.primitives
        } else {
            &self.composer
        };
        generator.generate(level, population, rng).map_err(|e| {
            warn!(level, generator = generator.name(), error = %e, "level generation failed");
            e
        })
    }

    /// Generate all `num_levels` levels.
    pub fn generate_population(&self, rng: &mut dyn RngCore) -> ModelResult<ConceptPopulation> {
        let mut population = ConceptPopulation::new();
        for level in 0..self.config.num_levels {
            let concepts = self.generate_level_concepts(level, &population, rng)?;
            population.push_level(concepts)?;
        }
        InvariantChecker::check_hierarchy(&population)?;
        Ok(population)
    }

    /// Mix the flattened population into an observation of `input`'s shape.
    pub fn generate_observations(
        &self,
        population: &ConceptPopulation,
        input: &Tensor,
        rng: &mut dyn RngCore,
    ) -> ModelResult<MixOutput> {
        self.mixer
            .mix(&population.flatten(), input, rng)
            .map_err(|e| {
                warn!(concepts = population.len(), error = %e, "mixing failed");
                e
            })
    }

    /// Full generative pass: population, then weights and observation.
    pub fn run(&self, input: &Tensor, rng: &mut dyn RngCore) -> ModelResult<ModelRun> {
        let population = self.generate_population(rng)?;
        let MixOutput {
            weights,
            observation,
        } = self.generate_observations(&population, input, rng)?;

        info!(
            levels = population.num_levels(),
            concepts = population.len(),
            level_sizes = ?population.level_sizes(),
            elements = observation.len(),
            "generative run complete"
        );
        Ok(ModelRun {
            population,
            weights,
            observation,
        })
    }
}
