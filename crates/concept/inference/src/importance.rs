//! Concept importance from posterior mean weights.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use concept_types::{Concept, ConceptId};

use crate::error::{InferenceError, InferenceResult};
use crate::posterior::PosteriorApproximation;

/// Posterior mean weight of one concept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConceptImportance {
    pub concept: ConceptId,
    pub weight: f64,
}

/// Mean posterior weight for every concept, in the order of `concepts`.
pub fn infer_concept_importance(
    posterior: &dyn PosteriorApproximation,
    concepts: &[Arc<Concept>],
) -> InferenceResult<Vec<ConceptImportance>> {
    if posterior.dimension() != concepts.len() {
        warn!(
            posterior = posterior.name(),
            dimension = posterior.dimension(),
            concepts = concepts.len(),
            "posterior does not cover the concept list"
        );
        return Err(InferenceError::DimensionMismatch {
            expected: concepts.len(),
            actual: posterior.dimension(),
        });
    }
    let importance: Vec<ConceptImportance> = concepts
        .iter()
        .zip(posterior.mean_weights())
        .map(|(c, weight)| ConceptImportance {
            concept: c.id(),
            weight,
        })
        .collect();
    debug!(posterior = posterior.name(), concepts = importance.len(), "importance inferred");
    Ok(importance)
}

/// Concept with the largest mean weight (first on ties).
pub fn most_important(importance: &[ConceptImportance]) -> Option<&ConceptImportance> {
    importance
        .iter()
        .reduce(|best, c| if c.weight > best.weight { c } else { best })
}
