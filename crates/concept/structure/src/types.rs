//! Structure discovery types: configuration, correlation matrix, linkage
//! steps and the final report.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use concept_types::ConceptId;

use crate::error::{StructureError, StructureResult};

/// Default distance at which the dendrogram is cut into flat clusters.
pub const DEFAULT_CUT_THRESHOLD: f64 = 0.5;

// ── Configuration ───────────────────────────────────────────────────────

/// Cluster-to-cluster distance update rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkageMethod {
    /// Nearest pair of members.
    #[default]
    Single,
    /// Farthest pair of members.
    Complete,
    /// Unweighted mean over member pairs (UPGMA).
    Average,
}

impl LinkageMethod {
    /// Lance–Williams update: distance from the merge of `a` and `b` to `k`.
    pub fn update(&self, d_ak: f64, d_bk: f64, size_a: usize, size_b: usize) -> f64 {
        match self {
            LinkageMethod::Single => d_ak.min(d_bk),
            LinkageMethod::Complete => d_ak.max(d_bk),
            LinkageMethod::Average => {
                let (na, nb) = (size_a as f64, size_b as f64);
                (na * d_ak + nb * d_bk) / (na + nb)
            }
        }
    }
}

impl fmt::Display for LinkageMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkageMethod::Single => write!(f, "single"),
            LinkageMethod::Complete => write!(f, "complete"),
            LinkageMethod::Average => write!(f, "average"),
        }
    }
}

/// Configuration for structure discovery.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Merges at a distance `<= threshold` end up in the same flat cluster.
    pub threshold: f64,
    pub method: LinkageMethod,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CUT_THRESHOLD,
            method: LinkageMethod::Single,
        }
    }
}

impl StructureConfig {
    pub fn validate(&self) -> StructureResult<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(StructureError::InvalidConfig(format!(
                "cut threshold must be finite and non-negative, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

// ── Correlation Matrix ──────────────────────────────────────────────────

/// Square, symmetric matrix of pairwise Pearson correlations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationMatrix {
    rows: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Wrap `rows`, checking that the matrix is square.
    pub fn new(rows: Vec<Vec<f64>>) -> StructureResult<Self> {
        let n = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(StructureError::Linkage(format!(
                "correlation matrix is not square: row {} has {} entries, expected {}",
                i,
                row.len(),
                n
            )));
        }
        Ok(Self { rows })
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.rows.get(i).and_then(|r| r.get(j)).copied()
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.rows.get(i).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size()).all(|i| (0..i).all(|j| self.rows[i][j] == self.rows[j][i]))
    }
}

// ── Linkage ─────────────────────────────────────────────────────────────

/// One agglomeration step.
///
/// Cluster ids below the leaf count are leaf concepts; the cluster
/// created by step `k` gets id `leaves + k`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkageStep {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
    /// Number of leaves in the merged cluster.
    pub size: usize,
}

// ── Report ──────────────────────────────────────────────────────────────

/// Result of a discovery pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StructureReport {
    /// Concepts in flattened (level-major) order; all indices below refer
    /// to positions in this list.
    pub concepts: Vec<ConceptId>,
    pub correlation: CorrelationMatrix,
    pub linkage: Vec<LinkageStep>,
    /// 1-based flat cluster id per concept.
    pub clusters: Vec<usize>,
    /// Cluster id → member concept indices, ascending.
    pub hierarchy: BTreeMap<usize, Vec<usize>>,
    pub method: LinkageMethod,
    pub threshold: f64,
}

impl StructureReport {
    pub fn num_clusters(&self) -> usize {
        self.hierarchy.len()
    }

    /// Cluster id of the concept at flattened index `index`.
    pub fn cluster_of(&self, index: usize) -> Option<usize> {
        self.clusters.get(index).copied()
    }

    /// Whether two flattened concepts share a flat cluster.
    pub fn same_cluster(&self, a: usize, b: usize) -> bool {
        matches!((self.cluster_of(a), self.cluster_of(b)), (Some(x), Some(y)) if x == y)
    }

    /// Member concept ids of a cluster.
    pub fn members(&self, cluster: usize) -> Vec<ConceptId> {
        self.hierarchy
            .get(&cluster)
            .map(|idx| idx.iter().filter_map(|&i| self.concepts.get(i).copied()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = StructureConfig::default();
        assert!((cfg.threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(cfg.method, LinkageMethod::Single);
        assert!(cfg.validate().is_ok());
        assert!(StructureConfig {
            threshold: -1.0,
            ..cfg
        }
        .validate()
        .is_err());
    }

    #[test]
    fn lance_williams_updates() {
        assert_eq!(LinkageMethod::Single.update(1.0, 3.0, 1, 1), 1.0);
        assert_eq!(LinkageMethod::Complete.update(1.0, 3.0, 1, 1), 3.0);
        assert_eq!(LinkageMethod::Average.update(1.0, 4.0, 2, 1), 2.0);
    }

    #[test]
    fn matrix_must_be_square() {
        assert!(CorrelationMatrix::new(vec![vec![1.0, 0.0], vec![0.0]]).is_err());
        let m = CorrelationMatrix::new(vec![vec![1.0, 0.2], vec![0.2, 1.0]]).unwrap();
        assert_eq!(m.size(), 2);
        assert_eq!(m.get(0, 1), Some(0.2));
        assert!(m.is_symmetric());
    }

    #[test]
    fn method_serializes_snake_case() {
        let json = serde_json::to_string(&LinkageMethod::Average).unwrap();
        assert_eq!(json, "\"average\"");
        let cfg: StructureConfig = serde_json::from_str(r#"{"method": "complete"}"#).unwrap();
        assert_eq!(cfg.method, LinkageMethod::Complete);
        assert!((cfg.threshold - DEFAULT_CUT_THRESHOLD).abs() < f64::EPSILON);
    }
}
