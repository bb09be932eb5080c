use thiserror::Error;

use crate::concept::{ConceptId, ConceptKind};

/// Errors raised while constructing or evaluating concepts.
#[derive(Debug, Error)]
pub enum ConceptError {
    #[error("concept {id} cannot have kind {kind}: {detail}")]
    KindMismatch {
        id: ConceptId,
        kind: ConceptKind,
        detail: String,
    },

    #[error("degenerate structure: {0}")]
    DegenerateStructure(String),

    #[error("level violation: {id} references {component} (expected a level {expected} component)")]
    LevelViolation {
        id: ConceptId,
        component: ConceptId,
        expected: usize,
    },

    #[error("unknown component {component} referenced by {id}")]
    UnknownComponent { id: ConceptId, component: ConceptId },

    #[error("concept {id} placed at level {level} position {position}")]
    Misplaced {
        id: ConceptId,
        level: usize,
        position: usize,
    },

    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("invalid weight vector: {0}")]
    InvalidWeights(String),

    #[error("non-finite value {value} from concept {concept} at element {position}")]
    NonFinite {
        concept: ConceptId,
        position: usize,
        value: f64,
    },

    #[error("invariant violation: {invariant} -- {detail}")]
    InvariantViolation { invariant: String, detail: String },
}

/// Convenience type alias for concept results.
pub type ConceptResult<T> = Result<T, ConceptError>;
