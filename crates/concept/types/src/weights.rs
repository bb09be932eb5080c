//! Simplex-valued mixing weights, one per flattened concept.

use serde::{Deserialize, Serialize};

use crate::error::{ConceptError, ConceptResult};
use crate::invariants::SIMPLEX_TOLERANCE;

/// Non-negative weights summing to one.
///
/// An empty vector is accepted: a run with no concepts mixes nothing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    pub fn new(weights: Vec<f64>) -> ConceptResult<Self> {
        if let Some((i, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(ConceptError::InvalidWeights(format!(
                "weight {} is {}",
                i, w
            )));
        }
        if !weights.is_empty() {
            let total: f64 = weights.iter().sum();
            if (total - 1.0).abs() > SIMPLEX_TOLERANCE {
                return Err(ConceptError::InvalidWeights(format!(
                    "weights sum to {} (expected 1 within {})",
                    total, SIMPLEX_TOLERANCE
                )));
            }
        }
        Ok(Self(weights))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Whether the weights lie on the simplex within `tolerance`.
    pub fn is_simplex(&self, tolerance: f64) -> bool {
        self.0.iter().all(|w| *w >= 0.0) && (self.is_empty() || (self.sum() - 1.0).abs() <= tolerance)
    }

    /// Index of the largest weight.
    pub fn argmax(&self) -> Option<usize> {
        self.0
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }
}
