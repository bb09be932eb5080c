//! Concept model invariants -- constants and runtime checks.
//!
//! - **Hierarchy**: a level-L concept (L ≥ 1) references only level L−1
//!   concepts of the same population
//! - **Grounding**: level 0 is non-empty whenever a higher level is
//! - **Simplex**: mixing weights are non-negative and sum to 1
//! - **Shape**: an observation has exactly the shape of its input

use std::sync::Arc;

use crate::error::{ConceptError, ConceptResult};
use crate::population::ConceptPopulation;
use crate::tensor::Tensor;
use crate::weights::WeightVector;

/// Tolerance for the weight-sum check.
pub const SIMPLEX_TOLERANCE: f64 = 1e-6;

/// Runtime invariant checker for generated populations and mixer output.
pub struct InvariantChecker;

impl InvariantChecker {
    /// Check hierarchy and grounding over a whole population.
    pub fn check_hierarchy(population: &ConceptPopulation) -> ConceptResult<()> {
        for (level, concepts) in population.levels().iter().enumerate() {
            if level > 0 && !concepts.is_empty() {
                let below = population.level(level - 1).unwrap_or(&[]);
                if below.is_empty() {
                    return Err(ConceptError::InvariantViolation {
                        invariant: "grounding".into(),
                        detail: format!("level {} is populated but level {} is empty", level, level - 1),
                    });
                }
            }
            for concept in concepts {
                for component in concept.components() {
                    let cid = component.id();
                    let resolves = level > 0
                        && cid.level == level - 1
                        && population
                            .get(cid)
                            .map(|stored| Arc::ptr_eq(stored, component))
                            .unwrap_or(false);
                    if !resolves {
                        return Err(ConceptError::InvariantViolation {
                            invariant: "hierarchy".into(),
                            detail: format!("{} references {}", concept.id(), cid),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn check_simplex(weights: &WeightVector, tolerance: f64) -> ConceptResult<()> {
        if !weights.is_simplex(tolerance) {
            return Err(ConceptError::InvariantViolation {
                invariant: "simplex".into(),
                detail: format!("weights sum to {}", weights.sum()),
            });
        }
        Ok(())
    }

    pub fn check_shape(input: &Tensor, output: &Tensor) -> ConceptResult<()> {
        if input.shape() != output.shape() {
            return Err(ConceptError::ShapeMismatch {
                expected: input.shape().to_vec(),
                actual: output.shape().to_vec(),
            });
        }
        Ok(())
    }
}
