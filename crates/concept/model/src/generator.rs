//! Level generators and the level-0 primitive generator.
//!
//! A [`LevelGenerator`] produces the concepts of one level given the
//! population built so far. Level 0 is served by [`PrimitiveGenerator`];
//! levels ≥ 1 by [`crate::composer::HierarchicalComposer`].

use rand::RngCore;
use tracing::debug;

use concept_types::{Concept, ConceptId, ConceptKind, ConceptPopulation};

use crate::config::CountSpec;
use crate::error::{ModelError, ModelResult};
use crate::sampling::{concept_type_site, num_concepts_site, sample_count, sample_uniform};

// ── Trait ────────────────────────────────────────────────────────────────

/// Produces the concepts of a single level.
pub trait LevelGenerator {
    /// Generate the concepts of `level`. `population` holds levels
    /// `0..level` and is never modified.
    fn generate(
        &self,
        level: usize,
        population: &ConceptPopulation,
        rng: &mut dyn RngCore,
    ) -> ModelResult<Vec<Concept>>;

    /// Name of this generator (for logs).
    fn name(&self) -> &str;
}

// ── Primitive Generator ─────────────────────────────────────────────────

/// Samples level-0 concepts from the fixed primitive family.
///
/// Draw order: the count, then one uniform kind per concept.
#[derive(Clone, Debug)]
pub struct PrimitiveGenerator {
    pub concept_count: CountSpec,
}

impl PrimitiveGenerator {
    pub fn new(concept_count: CountSpec) -> Self {
        Self { concept_count }
    }
}

impl LevelGenerator for PrimitiveGenerator {
    fn generate(
        &self,
        level: usize,
        population: &ConceptPopulation,
        rng: &mut dyn RngCore,
    ) -> ModelResult<Vec<Concept>> {
        if level != 0 || population.num_levels() != 0 {
            return Err(ModelError::InvalidConfig(format!(
                "primitive generator only builds level 0 of an empty population (asked for level {})",
                level
            )));
        }

        let count = sample_count(&self.concept_count, &num_concepts_site(level), rng)?;
        let mut concepts = Vec::with_capacity(count);
        for index in 0..count {
            let kind = *sample_uniform(
                &ConceptKind::PRIMITIVES,
                &concept_type_site(level, index),
                rng,
            )?;
            concepts.push(Concept::primitive(ConceptId::new(level, index), kind)?);
        }

        debug!(level, count, generator = self.name(), "level generated");
        Ok(concepts)
    }

    fn name(&self) -> &str {
        "primitive"
    }
}
