//! # concept-inference
//!
//! Posterior summaries over the mixture weights of a concept population.
//!
//! ## Architecture
//!
//! ```text
//!   concepts + input + observation
//!              │
//!              ▼
//!     ImportanceSampler ── Dirichlet(1) proposals, Gaussian likelihood
//!              │
//!              ▼
//!     EmpiricalPosterior : PosteriorApproximation
//!              │
//!      ┌───────┴──────────────┐
//!      ▼                      ▼
//!  PosteriorStatistics   infer_concept_importance
//!  (mean, std, q05, q95)  (mean weight per concept)
//! ```
//!
//! Any engine that can return weighted weight-vector samples plugs in as a
//! [`PosteriorApproximation`]; the bundled sampler keeps the pipeline
//! runnable without one.

#![deny(unsafe_code)]

pub mod error;
pub mod importance;
pub mod posterior;
pub mod sampler;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use error::{InferenceError, InferenceResult};
pub use importance::{infer_concept_importance, most_important, ConceptImportance};
pub use posterior::{
    EmpiricalPosterior, PosteriorApproximation, PosteriorStatistics, WeightSummary,
    LOWER_QUANTILE, UPPER_QUANTILE,
};
pub use sampler::{ImportanceSampler, SamplerConfig, DEFAULT_LIKELIHOOD_STD, DEFAULT_NUM_SAMPLES};
