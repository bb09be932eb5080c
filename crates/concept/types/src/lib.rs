//! # concept-types
//!
//! Core data model for hierarchical concept invention.
//!
//! A *concept* is a unary real function. Level-0 concepts are primitives;
//! every higher-level concept combines concepts from the level directly below.
//!
//! ```text
//!   level 2     ┌─────────┐          ┌─────────┐
//!               │ product │          │ compose │
//!               └──┬───┬──┘          └──┬───┬──┘
//!                  │   │                │   │      Arc back-references,
//!   level 1     ┌──▼┐ ┌▼──┐          ┌──▼┐ ┌▼──┐   never ownership
//!               │sum│ │sum│          │...│ │...│
//!               └┬─┬┘ └┬─┬┘          └───┘ └───┘
//!   level 0    x   x²  exp  log(|x|+ε)
//! ```
//!
//! The population is flattened level-major (level 0 first, in-level order
//! preserved) wherever a single concept list is needed.

#![deny(unsafe_code)]

pub mod concept;
pub mod error;
pub mod invariants;
pub mod population;
pub mod tensor;
pub mod weights;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use concept::{Concept, ConceptId, ConceptKind, LOG_EPSILON};
pub use error::{ConceptError, ConceptResult};
pub use invariants::{InvariantChecker, SIMPLEX_TOLERANCE};
pub use population::ConceptPopulation;
pub use tensor::Tensor;
pub use weights::WeightVector;
