//! Export-and-check pipeline for concepts.
//!
//! Proof checking proper lives behind [`ProofChecker`]; the bundled
//! [`RecordingChecker`] only records that a source file was produced.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use concept_types::{Concept, ConceptId};

use crate::error::SymbolicResult;
use crate::expr::Expr;
use crate::lean::LeanExporter;

/// What a checker concluded about an exported source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Exported but not checked by a proof system.
    Unchecked,
    Verified,
    Failed { message: String },
}

/// Exported source and verdict for one concept.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationResult {
    pub concept: ConceptId,
    pub expression: String,
    pub lean_source: String,
    pub status: VerificationStatus,
}

/// Checks Lean sources.
pub trait ProofChecker {
    fn check(&self, source: &str) -> SymbolicResult<VerificationStatus>;

    /// Name of this checker (for logs).
    fn name(&self) -> &str;
}

/// Accepts every source as [`VerificationStatus::Unchecked`].
#[derive(Clone, Debug, Default)]
pub struct RecordingChecker;

impl ProofChecker for RecordingChecker {
    fn check(&self, _source: &str) -> SymbolicResult<VerificationStatus> {
        Ok(VerificationStatus::Unchecked)
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Export `concept` to Lean and hand the source to `checker`.
pub fn verify_concept(
    concept: &Concept,
    exporter: &LeanExporter,
    checker: &dyn ProofChecker,
) -> SymbolicResult<VerificationResult> {
    let expr = Expr::from(concept);
    let lean_source = exporter.concept_source(&expr).map_err(|e| {
        warn!(concept = %concept.id(), error = %e, "lean export failed");
        e
    })?;
    let status = checker.check(&lean_source)?;
    debug!(concept = %concept.id(), checker = checker.name(), ?status, "concept verified");
    Ok(VerificationResult {
        concept: concept.id(),
        expression: expr.to_string(),
        lean_source,
        status,
    })
}

/// [`verify_concept`] over a list, stopping at the first error.
pub fn batch_verify_concepts(
    concepts: &[Arc<Concept>],
    exporter: &LeanExporter,
    checker: &dyn ProofChecker,
) -> SymbolicResult<Vec<VerificationResult>> {
    concepts
        .iter()
        .map(|c| verify_concept(c, exporter, checker))
        .collect()
}
