use concept_model::ModelError;
use concept_types::ConceptError;
use thiserror::Error;

/// Errors from posterior construction and summaries.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("posterior has no samples")]
    EmptyPosterior,

    #[error("no concepts to infer weights for")]
    NoConcepts,

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid sample weights: {0}")]
    InvalidWeights(String),

    #[error("invalid sampler configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Concept(#[from] ConceptError),
}

/// Convenience type alias for inference results.
pub type InferenceResult<T> = Result<T, InferenceError>;
