use concept_types::ConceptId;
use thiserror::Error;

/// Errors from structure discovery.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("correlation undefined: need at least 2 concepts and 2 observations, got {concepts} concept(s) and {observations} observation(s)")]
    CorrelationUndefined { concepts: usize, observations: usize },

    #[error("concept {concept} has zero variance over the observations")]
    ZeroVariance { concept: ConceptId },

    #[error("non-finite value {value} from concept {concept} at observation {observation}")]
    NonFinite {
        concept: ConceptId,
        observation: usize,
        value: f64,
    },

    #[error("correlation between concepts {left} and {right} is not finite")]
    CorrelationNonFinite { left: ConceptId, right: ConceptId },

    #[error("invalid structure configuration: {0}")]
    InvalidConfig(String),

    #[error("linkage failed: {0}")]
    Linkage(String),
}

impl StructureError {
    /// Whether the input was structurally unusable (too small or constant).
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            StructureError::CorrelationUndefined { .. } | StructureError::ZeroVariance { .. }
        )
    }
}

/// Convenience type alias for structure results.
pub type StructureResult<T> = Result<T, StructureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = StructureError::CorrelationUndefined {
            concepts: 1,
            observations: 10,
        };
        assert!(e.to_string().contains("1 concept(s)"));
        assert!(e.is_degenerate());

        let e = StructureError::ZeroVariance {
            concept: ConceptId::new(0, 2),
        };
        assert_eq!(
            e.to_string(),
            "concept c0.2 has zero variance over the observations"
        );

        let e = StructureError::NonFinite {
            concept: ConceptId::new(2, 0),
            observation: 7,
            value: f64::INFINITY,
        };
        assert_eq!(
            e.to_string(),
            "non-finite value inf from concept c2.0 at observation 7"
        );
        assert!(!e.is_degenerate());

        let e = StructureError::CorrelationNonFinite {
            left: ConceptId::new(0, 0),
            right: ConceptId::new(1, 3),
        };
        assert_eq!(
            e.to_string(),
            "correlation between concepts c0.0 and c1.3 is not finite"
        );
        assert!(!e.is_degenerate());
    }
}
