//! Weighted-sample posteriors over concept weight vectors.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{InferenceError, InferenceResult};

/// Lower quantile reported by [`PosteriorStatistics`].
pub const LOWER_QUANTILE: f64 = 0.05;

/// Upper quantile reported by [`PosteriorStatistics`].
pub const UPPER_QUANTILE: f64 = 0.95;

/// Tolerance when checking that sample weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Summary of one coordinate of the posterior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightSummary {
    pub mean: f64,
    pub std: f64,
    pub q05: f64,
    pub q95: f64,
}

/// Per-concept summaries, in flattened population order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PosteriorStatistics {
    pub concepts: Vec<WeightSummary>,
    pub effective_sample_size: f64,
}

impl PosteriorStatistics {
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn means(&self) -> Vec<f64> {
        self.concepts.iter().map(|s| s.mean).collect()
    }
}

/// An approximation to the posterior over concept weights.
///
/// Inference engines hand back an implementation of this trait; the rest
/// of the pipeline only reads summaries from it.
pub trait PosteriorApproximation {
    /// Number of concepts (length of each weight sample).
    fn dimension(&self) -> usize;

    /// Posterior mean weight of every concept.
    fn mean_weights(&self) -> Vec<f64>;

    fn statistics(&self) -> InferenceResult<PosteriorStatistics>;

    /// Name of this approximation (for logs).
    fn name(&self) -> &str;
}

/// Weight-vector samples with normalised importance weights.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmpiricalPosterior {
    samples: Vec<Vec<f64>>,
    weights: Vec<f64>,
}

impl EmpiricalPosterior {
    /// Build from samples and non-negative weights summing to one.
    pub fn new(samples: Vec<Vec<f64>>, weights: Vec<f64>) -> InferenceResult<Self> {
        if samples.is_empty() {
            return Err(InferenceError::EmptyPosterior);
        }
        if samples.len() != weights.len() {
            return Err(InferenceError::DimensionMismatch {
                expected: samples.len(),
                actual: weights.len(),
            });
        }
        let dimension = samples[0].len();
        if let Some(bad) = samples.iter().find(|s| s.len() != dimension) {
            return Err(InferenceError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(InferenceError::InvalidWeights(
                "weights must be finite and non-negative".into(),
            ));
        }
        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            warn!(total, "posterior weights are not normalised");
            return Err(InferenceError::InvalidWeights(format!(
                "weights sum to {}",
                total
            )));
        }
        Ok(Self { samples, weights })
    }

    /// Equally weighted samples, as returned by a plain sampler.
    pub fn uniform(samples: Vec<Vec<f64>>) -> InferenceResult<Self> {
        let n = samples.len();
        Self::new(samples, vec![1.0 / n.max(1) as f64; n])
    }

    /// Build from unnormalised log weights, normalising in log space.
    pub fn from_log_weights(samples: Vec<Vec<f64>>, log_weights: &[f64]) -> InferenceResult<Self> {
        let max = log_weights
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(InferenceError::InvalidWeights(format!(
                "largest log weight is {}",
                max
            )));
        }
        let unnormalised: Vec<f64> = log_weights.iter().map(|lw| (lw - max).exp()).collect();
        let total: f64 = unnormalised.iter().sum();
        Self::new(samples, unnormalised.iter().map(|w| w / total).collect())
    }

    pub fn samples(&self) -> &[Vec<f64>] {
        &self.samples
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Kish effective sample size, `1 / Σ wᵢ²`.
    pub fn effective_sample_size(&self) -> f64 {
        1.0 / self.weights.iter().map(|w| w * w).sum::<f64>()
    }

    fn summarize(&self, coordinate: usize) -> WeightSummary {
        let mean: f64 = self
            .samples
            .iter()
            .zip(&self.weights)
            .map(|(s, w)| w * s[coordinate])
            .sum();
        let var: f64 = self
            .samples
            .iter()
            .zip(&self.weights)
            .map(|(s, w)| w * (s[coordinate] - mean).powi(2))
            .sum();

        let mut sorted: Vec<(f64, f64)> = self
            .samples
            .iter()
            .zip(&self.weights)
            .map(|(s, w)| (s[coordinate], *w))
            .collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        WeightSummary {
            mean,
            std: var.max(0.0).sqrt(),
            q05: weighted_quantile(&sorted, LOWER_QUANTILE),
            q95: weighted_quantile(&sorted, UPPER_QUANTILE),
        }
    }
}

/// Smallest value whose cumulative weight reaches `q`. `sorted` is
/// non-empty and ordered by value.
fn weighted_quantile(sorted: &[(f64, f64)], q: f64) -> f64 {
    let mut cumulative = 0.0;
    for &(value, weight) in sorted {
        cumulative += weight;
        if cumulative >= q - WEIGHT_SUM_TOLERANCE {
            return value;
        }
    }
    sorted.last().map(|(v, _)| *v).unwrap_or(f64::NAN)
}

impl PosteriorApproximation for EmpiricalPosterior {
    fn dimension(&self) -> usize {
        self.samples.first().map(Vec::len).unwrap_or(0)
    }

    fn mean_weights(&self) -> Vec<f64> {
        (0..self.dimension())
            .map(|i| {
                self.samples
                    .iter()
                    .zip(&self.weights)
                    .map(|(s, w)| w * s[i])
                    .sum()
            })
            .collect()
    }

    fn statistics(&self) -> InferenceResult<PosteriorStatistics> {
        Ok(PosteriorStatistics {
            concepts: (0..self.dimension()).map(|i| self.summarize(i)).collect(),
            effective_sample_size: self.effective_sample_size(),
        })
    }

    fn name(&self) -> &str {
        "empirical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_point() -> EmpiricalPosterior {
        EmpiricalPosterior::new(
            vec![vec![0.2, 0.8], vec![0.6, 0.4]],
            vec![0.5, 0.5],
        )
        .unwrap()
    }

    #[test]
    fn mean_and_std() {
        let stats = two_point().statistics().unwrap();
        assert_eq!(stats.len(), 2);
        assert!((stats.concepts[0].mean - 0.4).abs() < 1e-12);
        assert!((stats.concepts[1].mean - 0.6).abs() < 1e-12);
        assert!((stats.concepts[0].std - 0.2).abs() < 1e-12);
        assert!((stats.effective_sample_size - 2.0).abs() < 1e-12);
    }

    #[test]
    fn quantiles_follow_the_weights() {
        let samples: Vec<Vec<f64>> = (0..100).map(|i| vec![i as f64]).collect();
        let post = EmpiricalPosterior::uniform(samples).unwrap();
        let s = &post.statistics().unwrap().concepts[0];
        assert_eq!(s.q05, 4.0);
        assert_eq!(s.q95, 94.0);

        let skewed =
            EmpiricalPosterior::new(vec![vec![1.0], vec![2.0]], vec![0.01, 0.99]).unwrap();
        let s = &skewed.statistics().unwrap().concepts[0];
        assert_eq!((s.q05, s.q95), (2.0, 2.0));
    }

    #[test]
    fn log_weights_are_normalised() {
        let post = EmpiricalPosterior::from_log_weights(
            vec![vec![1.0], vec![0.0]],
            &[-1000.0, -1000.0 - 2f64.ln()],
        )
        .unwrap();
        assert!((post.weights()[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((post.mean_weights()[0] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn malformed_inputs_rejected() {
        assert!(matches!(
            EmpiricalPosterior::uniform(vec![]),
            Err(InferenceError::EmptyPosterior)
        ));
        assert!(matches!(
            EmpiricalPosterior::new(vec![vec![1.0], vec![1.0, 2.0]], vec![0.5, 0.5]),
            Err(InferenceError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            EmpiricalPosterior::new(vec![vec![1.0]], vec![0.5]),
            Err(InferenceError::InvalidWeights(_))
        ));
        assert!(EmpiricalPosterior::from_log_weights(vec![vec![1.0]], &[f64::NAN]).is_err());
    }
}
