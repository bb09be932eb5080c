//! Importance sampling of concept weights under the Dirichlet prior.

use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use concept_model::sampling::sample_simplex;
use concept_types::{Concept, Tensor};

use crate::error::{InferenceError, InferenceResult};
use crate::posterior::EmpiricalPosterior;

/// Default number of prior draws.
pub const DEFAULT_NUM_SAMPLES: usize = 1000;

/// Default observation noise assumed by the likelihood.
pub const DEFAULT_LIKELIHOOD_STD: f64 = 0.1;

/// Importance sampler settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub num_samples: usize,
    pub likelihood_std: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            num_samples: DEFAULT_NUM_SAMPLES,
            likelihood_std: DEFAULT_LIKELIHOOD_STD,
        }
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> InferenceResult<()> {
        if self.num_samples == 0 {
            return Err(InferenceError::InvalidConfig(
                "num_samples must be positive".into(),
            ));
        }
        if !(self.likelihood_std.is_finite() && self.likelihood_std > 0.0) {
            return Err(InferenceError::InvalidConfig(format!(
                "likelihood_std must be finite and positive, got {}",
                self.likelihood_std
            )));
        }
        Ok(())
    }
}

/// Draws weight vectors from `Dirichlet(1, ..., 1)` and weights each by the
/// Gaussian likelihood of the observation.
#[derive(Clone, Debug, Default)]
pub struct ImportanceSampler {
    config: SamplerConfig,
}

impl ImportanceSampler {
    pub fn new(config: SamplerConfig) -> InferenceResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Approximate `p(weights | observation)` for the given concepts.
    ///
    /// `input` and `observation` must have the same number of elements.
    pub fn fit(
        &self,
        concepts: &[Arc<Concept>],
        input: &Tensor,
        observation: &Tensor,
        rng: &mut dyn RngCore,
    ) -> InferenceResult<EmpiricalPosterior> {
        if concepts.is_empty() {
            warn!("importance sampling requested without concepts");
            return Err(InferenceError::NoConcepts);
        }
        if input.len() != observation.len() {
            warn!(
                input = input.len(),
                observation = observation.len(),
                "observation does not match input"
            );
            return Err(InferenceError::DimensionMismatch {
                expected: input.len(),
                actual: observation.len(),
            });
        }

        let outputs = concepts
            .iter()
            .map(|c| c.evaluate_finite(input.data()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                warn!(error = %e, "concept output is not finite on this input");
                e
            })?;

        let scale = 2.0 * self.config.likelihood_std * self.config.likelihood_std;
        let mut samples = Vec::with_capacity(self.config.num_samples);
        let mut log_weights = Vec::with_capacity(self.config.num_samples);
        for _ in 0..self.config.num_samples {
            let weights = sample_simplex(concepts.len(), rng)?;
            let sse: f64 = observation
                .iter()
                .enumerate()
                .map(|(j, y)| {
                    let predicted: f64 = weights
                        .iter()
                        .zip(&outputs)
                        .map(|(w, out)| w * out[j])
                        .sum();
                    (y - predicted).powi(2)
                })
                .sum();
            log_weights.push(-sse / scale);
            samples.push(weights);
        }

        let posterior = EmpiricalPosterior::from_log_weights(samples, &log_weights)?;
        info!(
            concepts = concepts.len(),
            samples = posterior.num_samples(),
            ess = posterior.effective_sample_size(),
            "importance sampling finished"
        );
        debug!(likelihood_std = self.config.likelihood_std, "sampler settings");
        Ok(posterior)
    }
}
