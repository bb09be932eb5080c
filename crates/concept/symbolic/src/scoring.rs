//! Fit-plus-complexity scoring of concepts (lower is better).

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use concept_types::{Concept, ConceptId};

use crate::error::{SymbolicError, SymbolicResult};
use crate::expr::Expr;
use crate::simplify::simplify;

/// Weight of complexity against mean squared error.
pub const COMPLEXITY_PENALTY: f64 = 0.1;

/// Node count of the simplified symbolic form.
pub fn concept_complexity(concept: &Concept) -> usize {
    simplify(&Expr::from(concept)).node_count()
}

/// `MSE(concept(data), data) + 0.1 × complexity`.
pub fn evaluate_concept(concept: &Concept, data: &[f64]) -> SymbolicResult<f64> {
    if data.is_empty() {
        return Err(SymbolicError::EmptyData);
    }
    let mut sum = 0.0;
    for &x in data {
        let y = concept.evaluate(x);
        if !y.is_finite() {
            return Err(SymbolicError::NonFinite {
                context: format!("scoring {} at {}", concept.id(), x),
                value: y,
            });
        }
        sum += (y - x) * (y - x);
    }
    let mse = sum / data.len() as f64;
    Ok(mse + COMPLEXITY_PENALTY * concept_complexity(concept) as f64)
}

/// A scored concept.
#[derive(Clone, Debug, Serialize)]
pub struct RankedConcept {
    pub concept: ConceptId,
    pub expression: String,
    pub complexity: usize,
    pub score: f64,
}

/// Score every concept and sort ascending by score (ties keep input order).
pub fn rank_concepts(concepts: &[Arc<Concept>], data: &[f64]) -> SymbolicResult<Vec<RankedConcept>> {
    let mut ranked = concepts
        .iter()
        .map(|c| {
            Ok(RankedConcept {
                concept: c.id(),
                expression: simplify(&Expr::from(c.as_ref())).to_string(),
                complexity: concept_complexity(c),
                score: evaluate_concept(c, data)?,
            })
        })
        .collect::<SymbolicResult<Vec<_>>>()?;
    ranked.sort_by(|a, b| a.score.total_cmp(&b.score));
    debug!(concepts = ranked.len(), "concepts ranked");
    Ok(ranked)
}
