//! # concept-symbolic
//!
//! Symbolic view of concepts.
//!
//! ## Architecture
//!
//! ```text
//!   Concept ──From──► Expr (free variable x)
//!                      │
//!        ┌─────────────┼──────────────┬───────────────┐
//!        ▼             ▼              ▼               ▼
//!    simplify     reasoning       LeanExporter     scoring
//!                 (apply_rule,    └─► verify_concept  (MSE + 0.1·complexity)
//!                  theorems,          └─► ProofChecker
//!                  patterns)
//!                      │
//!                      ▼
//!               TheoremOracle (SampleOracle)
//! ```

#![deny(unsafe_code)]

pub mod convert;
pub mod error;
pub mod expr;
pub mod lean;
pub mod oracle;
pub mod reasoning;
pub mod scoring;
pub mod simplify;
pub mod verify;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use convert::concept_expression;
pub use error::{SymbolicError, SymbolicResult};
pub use expr::{Expr, VAR};
pub use lean::{LeanExporter, LEAN_DEF_NAME, LEAN_HEADER, LEAN_THEOREM_NAME};
pub use oracle::{
    OracleConfig, ProofOutcome, SampleOracle, TheoremOracle, DEFAULT_ORACLE_SAMPLES,
    DEFAULT_ORACLE_TOLERANCE,
};
pub use reasoning::{
    apply_rule, discover_patterns, generalize_concept, generate_theorem, Theorem,
    TheoremGenerator, DEFAULT_MAX_THEOREM_TERMS, GENERALIZATION_VAR,
};
pub use scoring::{concept_complexity, evaluate_concept, rank_concepts, RankedConcept, COMPLEXITY_PENALTY};
pub use simplify::simplify;
pub use verify::{
    batch_verify_concepts, verify_concept, ProofChecker, RecordingChecker, VerificationResult,
    VerificationStatus,
};
