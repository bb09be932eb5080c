//! Concept evaluation over observation scalars and Pearson correlation.

use std::sync::Arc;

use concept_types::{Concept, ConceptId};

use crate::error::{StructureError, StructureResult};
use crate::types::CorrelationMatrix;

/// Relative spread below which a concept's outputs count as constant.
pub const ZERO_VARIANCE_TOLERANCE: f64 = 1e-12;

/// Evaluate every concept on every observation (concepts × observations).
///
/// Fails on the first non-finite value, naming the concept and the
/// observation index.
pub fn evaluate_concepts(
    concepts: &[Arc<Concept>],
    observations: &[f64],
) -> StructureResult<Vec<Vec<f64>>> {
    concepts
        .iter()
        .map(|concept| {
            let row = concept.evaluate_all(observations);
            match row.iter().position(|v| !v.is_finite()) {
                Some(observation) => Err(StructureError::NonFinite {
                    concept: concept.id(),
                    observation,
                    value: row[observation],
                }),
                None => Ok(row),
            }
        })
        .collect()
}

/// Pearson correlation between the rows of `values`.
///
/// `ids` names the rows for error reporting. The result is symmetric with an
/// exact unit diagonal and entries clamped to `[-1, 1]`.
pub fn pearson_matrix(values: &[Vec<f64>], ids: &[ConceptId]) -> StructureResult<CorrelationMatrix> {
    let n = values.len();
    let m = values.first().map_or(0, Vec::len);
    if n < 2 || m < 2 {
        return Err(StructureError::CorrelationUndefined {
            concepts: n,
            observations: m,
        });
    }

    let mut centered = Vec::with_capacity(n);
    let mut norms = Vec::with_capacity(n);
    for (i, row) in values.iter().enumerate() {
        let id = ids.get(i).copied().unwrap_or(ConceptId::new(0, i));
        if row.len() != m {
            return Err(StructureError::Linkage(format!(
                "concept {} has {} values, expected {}",
                id,
                row.len(),
                m
            )));
        }
        // rows are scaled to unit peak so squares of large outputs stay finite
        let scale = row.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if scale == 0.0 {
            return Err(StructureError::ZeroVariance { concept: id });
        }
        let scaled: Vec<f64> = row.iter().map(|v| v / scale).collect();
        let mean = scaled.iter().sum::<f64>() / m as f64;
        let dev: Vec<f64> = scaled.iter().map(|v| v - mean).collect();
        let norm = dev.iter().map(|d| d * d).sum::<f64>().sqrt();
        // same bound as on the raw row, divided through by `scale`
        if norm <= ZERO_VARIANCE_TOLERANCE * (1.0 / scale + mean.abs()) * (m as f64).sqrt() {
            return Err(StructureError::ZeroVariance { concept: id });
        }
        centered.push(dev);
        norms.push(norm);
    }

    let mut rows = vec![vec![0.0; n]; n];
    for i in 0..n {
        rows[i][i] = 1.0;
        for j in 0..i {
            let dot: f64 = centered[i]
                .iter()
                .zip(&centered[j])
                .map(|(a, b)| a * b)
                .sum();
            let r = dot / (norms[i] * norms[j]);
            if !r.is_finite() {
                return Err(StructureError::CorrelationNonFinite {
                    left: ids.get(j).copied().unwrap_or(ConceptId::new(0, j)),
                    right: ids.get(i).copied().unwrap_or(ConceptId::new(0, i)),
                });
            }
            let r = r.clamp(-1.0, 1.0);
            rows[i][j] = r;
            rows[j][i] = r;
        }
    }
    CorrelationMatrix::new(rows)
}
