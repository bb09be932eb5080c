use concept_types::ConceptError;
use thiserror::Error;

/// Errors from the generative concept model.
///
/// Sampling failures name the draw site (`num_concepts_1`,
/// `num_components_2_4`, ...) so a failing level and index can be read off
/// the message.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid draw at site {site}: {value}")]
    InvalidDraw { site: String, value: f64 },

    #[error("invalid distribution at site {site}: {detail}")]
    InvalidDistribution { site: String, detail: String },

    #[error("degenerate structure at site {site}: {detail}")]
    DegenerateStructure { site: String, detail: String },

    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Concept(#[from] ConceptError),
}

impl ModelError {
    /// Whether this is a degenerate-structure failure, from either layer.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            ModelError::DegenerateStructure { .. }
                | ModelError::Concept(ConceptError::DegenerateStructure(_))
        )
    }
}

/// Convenience type alias for model results.
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = ModelError::InvalidDraw {
            site: "num_concepts_0".into(),
            value: -1.0,
        };
        assert_eq!(e.to_string(), "invalid draw at site num_concepts_0: -1");

        let e = ModelError::DegenerateStructure {
            site: "num_components_1_3".into(),
            detail: "zero components".into(),
        };
        assert!(e.to_string().contains("num_components_1_3"));
        assert!(e.is_degenerate());
    }

    #[test]
    fn concept_errors_convert() {
        let e: ModelError = ConceptError::DegenerateStructure("empty".into()).into();
        assert!(e.is_degenerate());
        assert_eq!(e.to_string(), "degenerate structure: empty");
    }

    #[test]
    fn result_type_works() {
        let ok: ModelResult<u32> = Ok(42);
        assert_eq!(ok.unwrap(), 42);

        let err: ModelResult<u32> = Err(ModelError::InvalidConfig("levels".into()));
        assert!(err.is_err());
    }
}
