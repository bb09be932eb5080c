use thiserror::Error;

/// Errors from symbolic manipulation, export and scoring.
#[derive(Debug, Error)]
pub enum SymbolicError {
    #[error("unbound symbol: {0}")]
    UnboundSymbol(String),

    #[error("non-finite value {value} while {context}")]
    NonFinite { context: String, value: f64 },

    #[error("theorem needs at least one concept")]
    EmptyClaim,

    #[error("no data to score against")]
    EmptyData,

    #[error("lean export failed: {0}")]
    Export(String),

    #[error("verification failed: {0}")]
    Verification(String),

    #[error("invalid oracle configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for symbolic results.
pub type SymbolicResult<T> = Result<T, SymbolicError>;
