//! # concept-model
//!
//! Hierarchical generative model over concepts.
//!
//! A run draws level 0 from the primitive family, builds each higher level
//! out of the level directly below, then mixes the whole population into a
//! single observation signal.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────┐
//!   │ PrimitiveGenerator   │  ← count ~ Poisson, kind ~ Uniform(4)
//!   └──────────┬───────────┘
//!              ▼  level 0
//!   ┌──────────────────────┐
//!   │ HierarchicalComposer │  ← per level L ≥ 1: count, components,
//!   └──────────┬───────────┘    indices into L−1, operation
//!              ▼  levels 0..num_levels
//!   ┌──────────────────────┐
//!   │ ObservationMixer     │  ← w ~ Dirichlet(1), Σ wᵢ·cᵢ(x) + noise
//!   └──────────┬───────────┘
//!              ▼
//!        ModelRun { population, weights, observation }
//! ```
//!
//! ## Draw order
//!
//! All randomness flows through one explicitly passed RNG, in a fixed order:
//! per level the count, then per concept its kind (level 0) or its
//! component count, component indices and operation (levels ≥ 1); then the
//! mixer weights; then one noise value per observation element. Seeding the
//! RNG therefore reproduces a run exactly.

#![deny(unsafe_code)]

pub mod composer;
pub mod config;
pub mod error;
pub mod generator;
pub mod mixer;
pub mod model;
pub mod sampling;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use composer::HierarchicalComposer;
pub use config::{
    CountSpec, ModelConfig, ZeroComponentPolicy, DEFAULT_COMPONENT_RATE, DEFAULT_CONCEPT_RATE,
    DEFAULT_MAX_RESAMPLE_ATTEMPTS, DEFAULT_NOISE_STD, DEFAULT_NUM_LEVELS, MAX_COUNT,
};
pub use error::{ModelError, ModelResult};
pub use generator::{LevelGenerator, PrimitiveGenerator};
pub use mixer::{MixOutput, ObservationMixer};
pub use model::{seeded_rng, ConceptModel, ModelRun};

#[cfg(test)]
mod tests {
    use super::*;
    use concept_types::{ConceptKind, InvariantChecker, Tensor};

    #[test]
    fn integration_three_level_run() {
        let model = ConceptModel::new(ModelConfig {
            concept_count: CountSpec::fixed(5),
            component_count: CountSpec::fixed(2),
            ..ModelConfig::default()
        })
        .unwrap();
        let input = Tensor::linspace(-1.0, -0.5, 16);
        let run = model.run(&input, &mut seeded_rng(2024)).unwrap();

        assert_eq!(run.population.level_sizes(), vec![5, 5, 5]);
        InvariantChecker::check_hierarchy(&run.population).unwrap();

        for concept in run.population.level(0).unwrap() {
            assert!(ConceptKind::PRIMITIVES.contains(&concept.kind()));
        }
        for level in 1..3 {
            for concept in run.population.level(level).unwrap() {
                assert!(ConceptKind::OPERATIONS.contains(&concept.kind()));
                assert_eq!(concept.components().len(), 2);
                assert!(concept.components().iter().all(|c| c.level() == level - 1));
            }
        }

        assert_eq!(run.weights.len(), 15);
        assert!(run.weights.is_simplex(1e-6));
        assert_eq!(run.observation.shape(), &[16]);
    }

    #[test]
    fn run_serializes_with_component_ids() {
        let model = ConceptModel::new(ModelConfig {
            num_levels: 2,
            concept_count: CountSpec::fixed(2),
            component_count: CountSpec::fixed(1),
            ..ModelConfig::default()
        })
        .unwrap();
        let run = model
            .run(&Tensor::from_vec(vec![-0.5]), &mut seeded_rng(1))
            .unwrap();
        let json = serde_json::to_value(&run).unwrap();
        assert!(json["population"].is_object());
        assert_eq!(json["weights"].as_array().unwrap().len(), 4);
        assert_eq!(json["observation"]["shape"][0], 1);
    }

    #[test]
    fn all_public_types_accessible() {
        let _ = ModelConfig::default();
        let _ = CountSpec::poisson(DEFAULT_CONCEPT_RATE);
        let _ = ZeroComponentPolicy::default();
        let _ = PrimitiveGenerator::new(CountSpec::fixed(1));
        let _ = HierarchicalComposer::new(
            CountSpec::fixed(1),
            CountSpec::fixed(1),
            ZeroComponentPolicy::Reject,
        );
        let _ = ObservationMixer::new(DEFAULT_NOISE_STD);
        let _ = seeded_rng(0);
        let _: ModelResult<()> = Ok(());
        let _ = DEFAULT_NUM_LEVELS + DEFAULT_MAX_RESAMPLE_ATTEMPTS;
        let _ = DEFAULT_COMPONENT_RATE;
        let _ = MAX_COUNT;
    }
}
