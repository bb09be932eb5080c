//! Serializable results of one experiment.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use concept_inference::{ConceptImportance, PosteriorStatistics};
use concept_structure::StructureReport;
use concept_symbolic::{ProofOutcome, RankedConcept, VerificationResult};
use concept_types::{ConceptPopulation, Tensor, WeightVector};

use crate::config::ExperimentConfig;

/// A checked equality claim.
#[derive(Clone, Debug, Serialize)]
pub struct TheoremCheck {
    pub claim: String,
    pub outcome: ProofOutcome,
}

/// Everything an experiment produced, in one serializable document.
#[derive(Clone, Debug, Serialize)]
pub struct ResultsBundle {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub seed: u64,
    pub config: ExperimentConfig,
    pub population: ConceptPopulation,
    pub weights: WeightVector,
    pub observation: Tensor,
    pub structure: Option<StructureReport>,
    pub posterior: Option<PosteriorStatistics>,
    pub importance: Vec<ConceptImportance>,
    pub verifications: Vec<VerificationResult>,
    pub theorems: Vec<TheoremCheck>,
    pub patterns: Vec<String>,
    pub rankings: Vec<RankedConcept>,
    /// Stages that were skipped, with the reason.
    pub skipped: Vec<String>,
}

impl ResultsBundle {
    pub fn num_concepts(&self) -> usize {
        self.population.len()
    }

    pub fn refuted_theorems(&self) -> usize {
        self.theorems.iter().filter(|t| t.outcome.is_refuted()).count()
    }
}
