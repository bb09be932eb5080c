//! Hierarchical concept composer for levels ≥ 1.
//!
//! Each new concept draws a component count, then that many indices into the
//! previous level (uniform, with replacement), then an operation out of
//! {sum, product, compose}.

use std::sync::Arc;

use rand::{Rng, RngCore};
use tracing::{debug, warn};

use concept_types::{Concept, ConceptId, ConceptKind, ConceptPopulation};

use crate::config::{CountSpec, ZeroComponentPolicy};
use crate::error::{ModelError, ModelResult};
use crate::generator::LevelGenerator;
use crate::sampling::{
    num_components_site, num_concepts_site, operation_site, sample_count, sample_uniform,
};

/// Builds composite concepts from the level directly below.
#[derive(Clone, Debug)]
pub struct HierarchicalComposer {
    pub concept_count: CountSpec,
    pub component_count: CountSpec,
    pub zero_component_policy: ZeroComponentPolicy,
}

impl HierarchicalComposer {
    pub fn new(
        concept_count: CountSpec,
        component_count: CountSpec,
        zero_component_policy: ZeroComponentPolicy,
    ) -> Self {
        Self {
            concept_count,
            component_count,
            zero_component_policy,
        }
    }

    /// Draw a non-zero component count, applying the zero-component policy.
    fn draw_component_count(
        &self,
        level: usize,
        index: usize,
        rng: &mut dyn RngCore,
    ) -> ModelResult<usize> {
        let site = num_components_site(level, index);
        let attempts = match self.zero_component_policy {
            ZeroComponentPolicy::Reject => 1,
            ZeroComponentPolicy::Resample { max_attempts } => max_attempts.max(1),
        };

        for _ in 0..attempts {
            let n = sample_count(&self.component_count, &site, rng)?;
            if n > 0 {
                return Ok(n);
            }
        }

        let detail = format!(
            "concept {} drew zero components ({} attempt(s), policy {:?})",
            ConceptId::new(level, index),
            attempts,
            self.zero_component_policy
        );
        warn!(%site, %detail, "rejecting degenerate composite");
        Err(ModelError::DegenerateStructure { site, detail })
    }
}

impl LevelGenerator for HierarchicalComposer {
    fn generate(
        &self,
        level: usize,
        population: &ConceptPopulation,
        rng: &mut dyn RngCore,
    ) -> ModelResult<Vec<Concept>> {
        if level == 0 || population.num_levels() != level {
            return Err(ModelError::InvalidConfig(format!(
                "composer builds level {} only on top of levels 0..{} (population has {})",
                level,
                level,
                population.num_levels()
            )));
        }

        let count = sample_count(&self.concept_count, &num_concepts_site(level), rng)?;
        let below = population.level(level - 1).unwrap_or(&[]);
        if below.is_empty() {
            if count > 0 {
                warn!(
                    level,
                    count, "previous level is empty; nothing to compose, level left empty"
                );
            }
            return Ok(Vec::new());
        }

        let mut concepts = Vec::with_capacity(count);
        for index in 0..count {
            let n = self.draw_component_count(level, index, rng)?;
            let components: Vec<Arc<Concept>> = (0..n)
                .map(|_| Arc::clone(&below[rng.gen_range(0..below.len())]))
                .collect();
            let kind = *sample_uniform(
                &ConceptKind::OPERATIONS,
                &operation_site(level, index),
                rng,
            )?;
            concepts.push(Concept::composite(
                ConceptId::new(level, index),
                kind,
                components,
            )?);
        }

        debug!(level, count, generator = self.name(), "level generated");
        Ok(concepts)
    }

    fn name(&self) -> &str {
        "composer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::PrimitiveGenerator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn base_population(n: usize, rng: &mut StdRng) -> ConceptPopulation {
        let mut pop = ConceptPopulation::new();
        let level0 = PrimitiveGenerator::new(CountSpec::fixed(n))
            .generate(0, &pop, rng)
            .unwrap();
        pop.push_level(level0).unwrap();
        pop
    }

    fn composer(components: CountSpec, policy: ZeroComponentPolicy) -> HierarchicalComposer {
        HierarchicalComposer::new(CountSpec::fixed(25), components, policy)
    }

    #[test]
    fn components_come_from_previous_level() {
        let mut rng = StdRng::seed_from_u64(21);
        let pop = base_population(4, &mut rng);
        let concepts = composer(CountSpec::poisson(2.0), ZeroComponentPolicy::default())
            .generate(1, &pop, &mut rng)
            .unwrap();
        assert_eq!(concepts.len(), 25);
        for (i, c) in concepts.iter().enumerate() {
            assert_eq!(c.id(), ConceptId::new(1, i));
            assert!(!c.kind().is_primitive());
            assert!(!c.components().is_empty());
            for comp in c.components() {
                assert_eq!(comp.level(), 0);
                assert!(Arc::ptr_eq(comp, &pop.level(0).unwrap()[comp.id().index]));
            }
        }
    }

    #[test]
    fn forced_zero_components_reject_policy_fails() {
        let mut rng = StdRng::seed_from_u64(2);
        let pop = base_population(3, &mut rng);
        let err = composer(CountSpec::fixed(0), ZeroComponentPolicy::Reject)
            .generate(1, &pop, &mut rng)
            .unwrap_err();
        assert!(err.is_degenerate());
        assert!(err.to_string().contains("num_components_1_0"));
    }

    #[test]
    fn forced_zero_components_resample_policy_fails_after_budget() {
        let mut rng = StdRng::seed_from_u64(2);
        let pop = base_population(3, &mut rng);
        let err = composer(
            CountSpec::fixed(0),
            ZeroComponentPolicy::Resample { max_attempts: 4 },
        )
        .generate(1, &pop, &mut rng)
        .unwrap_err();
        assert!(err.is_degenerate());
        assert!(err.to_string().contains("4 attempt(s)"));
    }

    #[test]
    fn fixed_component_count_is_respected() {
        let mut rng = StdRng::seed_from_u64(8);
        let pop = base_population(2, &mut rng);
        let concepts = composer(CountSpec::fixed(3), ZeroComponentPolicy::Reject)
            .generate(1, &pop, &mut rng)
            .unwrap();
        assert!(concepts.iter().all(|c| c.components().len() == 3));
    }

    #[test]
    fn empty_previous_level_leaves_level_empty() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut pop = ConceptPopulation::new();
        pop.push_level(vec![]).unwrap();
        let concepts = composer(CountSpec::fixed(2), ZeroComponentPolicy::Reject)
            .generate(1, &pop, &mut rng)
            .unwrap();
        assert!(concepts.is_empty());
    }

    #[test]
    fn refuses_out_of_order_level() {
        let mut rng = StdRng::seed_from_u64(8);
        let pop = base_population(2, &mut rng);
        let c = composer(CountSpec::fixed(1), ZeroComponentPolicy::Reject);
        assert!(c.generate(0, &pop, &mut rng).is_err());
        assert!(c.generate(2, &pop, &mut rng).is_err());
    }

    #[test]
    fn all_operations_appear() {
        let mut rng = StdRng::seed_from_u64(13);
        let pop = base_population(4, &mut rng);
        let concepts = HierarchicalComposer::new(
            CountSpec::fixed(60),
            CountSpec::fixed(2),
            ZeroComponentPolicy::Reject,
        )
        .generate(1, &pop, &mut rng)
        .unwrap();
        for op in ConceptKind::OPERATIONS {
            assert!(concepts.iter().any(|c| c.kind() == op), "missing {}", op);
        }
    }
}
