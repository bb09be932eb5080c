//! Observation mixer: weighted sum of concept outputs plus isotropic noise.

use std::sync::Arc;

use rand::RngCore;
use serde::Serialize;
use tracing::{debug, warn};

use concept_types::{Concept, ConceptError, InvariantChecker, Tensor, WeightVector, SIMPLEX_TOLERANCE};

use crate::error::ModelResult;
use crate::sampling::{sample_noise, sample_simplex};

/// Result of mixing: the sampled weights and the noisy observation.
#[derive(Clone, Debug, Serialize)]
pub struct MixOutput {
    pub weights: WeightVector,
    pub observation: Tensor,
}

/// Mixes a flattened concept list into one observation signal.
#[derive(Clone, Debug)]
pub struct ObservationMixer {
    pub noise_std: f64,
}

impl ObservationMixer {
    pub fn new(noise_std: f64) -> Self {
        Self { noise_std }
    }

    /// Sample weights ~ Dirichlet(1), compute Σ wᵢ·cᵢ(input), add noise.
    ///
    /// `concepts` must be in level-major order. Draws the weight vector first,
    /// then one noise value per input element.
    pub fn mix(
        &self,
        concepts: &[Arc<Concept>],
        input: &Tensor,
        rng: &mut dyn RngCore,
    ) -> ModelResult<MixOutput> {
        let weights = WeightVector::new(sample_simplex(concepts.len(), rng)?)?;
        InvariantChecker::check_simplex(&weights, SIMPLEX_TOLERANCE)?;

        let mut observation = Tensor::zeros_like(input);
        for (concept, weight) in concepts.iter().zip(weights.iter()) {
            let output = concept.evaluate_tensor(input);
            if let Some((position, value)) = output.first_non_finite() {
                let err = ConceptError::NonFinite {
                    concept: concept.id(),
                    position,
                    value,
                };
                warn!(error = %err, "concept output is not finite on this input");
                return Err(err.into());
            }
            observation.add_scaled(&output, *weight)?;
        }

        let noise = Tensor::new(
            input.shape().to_vec(),
            sample_noise(input.len(), self.noise_std, rng)?,
        )?;
        observation.add_assign(&noise)?;
        InvariantChecker::check_shape(input, &observation)?;

        debug!(
            concepts = concepts.len(),
            elements = input.len(),
            "observation mixed"
        );
        Ok(MixOutput {
            weights,
            observation,
        })
    }
}
