//! CLI error types

use thiserror::Error;

use concept_inference::InferenceError;
use concept_model::ModelError;
use concept_structure::StructureError;
use concept_symbolic::SymbolicError;
use concept_types::ConceptError;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Structure error: {0}")]
    Structure(#[from] StructureError),

    #[error("Symbolic error: {0}")]
    Symbolic(#[from] SymbolicError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Concept error: {0}")]
    Concept(#[from] ConceptError),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
