//! Structure discovery engine.

use std::sync::Arc;

use tracing::{debug, info, warn};

use concept_types::{Concept, ConceptId, ConceptPopulation, Tensor};

use crate::cluster::{cut_tree, hierarchy};
use crate::correlation::{evaluate_concepts, pearson_matrix};
use crate::error::{StructureError, StructureResult};
use crate::linkage::linkage;
use crate::types::{StructureConfig, StructureReport};

/// Discovers correlational clusters among concepts.
///
/// Concepts are evaluated on the observation scalars, correlated pairwise,
/// and clustered on their correlation profiles (rows of the correlation
/// matrix, compared by Euclidean distance).
#[derive(Clone, Debug, Default)]
pub struct StructureDiscovery {
    config: StructureConfig,
}

impl StructureDiscovery {
    pub fn new(config: StructureConfig) -> StructureResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    /// Run discovery over flattened `concepts` and `observations`.
    pub fn discover(
        &self,
        concepts: &[Arc<Concept>],
        observations: &[f64],
    ) -> StructureResult<StructureReport> {
        self.discover_inner(concepts, observations).map_err(|e| {
            warn!(
                concepts = concepts.len(),
                observations = observations.len(),
                error = %e,
                "structure discovery failed"
            );
            e
        })
    }

    /// Run discovery over a whole population, using every element of
    /// `observation` as one scalar.
    pub fn discover_population(
        &self,
        population: &ConceptPopulation,
        observation: &Tensor,
    ) -> StructureResult<StructureReport> {
        self.discover(&population.flatten(), observation.data())
    }

    fn discover_inner(
        &self,
        concepts: &[Arc<Concept>],
        observations: &[f64],
    ) -> StructureResult<StructureReport> {
        let ids: Vec<ConceptId> = concepts.iter().map(|c| c.id()).collect();

        // too small to correlate, whatever the concepts evaluate to
        if concepts.len() < 2 || observations.len() < 2 {
            return Err(StructureError::CorrelationUndefined {
                concepts: concepts.len(),
                observations: observations.len(),
            });
        }

        let values = evaluate_concepts(concepts, observations)?;
        let correlation = pearson_matrix(&values, &ids)?;
        debug!(concepts = ids.len(), observations = observations.len(), "correlation computed");

        let steps = linkage(correlation.rows(), self.config.method)?;
        let clusters = cut_tree(&steps, ids.len(), self.config.threshold);
        let hierarchy = hierarchy(&clusters);

        info!(
            concepts = ids.len(),
            clusters = hierarchy.len(),
            method = %self.config.method,
            threshold = self.config.threshold,
            "structure discovered"
        );

        Ok(StructureReport {
            concepts: ids,
            correlation,
            linkage: steps,
            clusters,
            hierarchy,
            method: self.config.method,
            threshold: self.config.threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concept_types::ConceptKind;

    fn prim(index: usize, kind: ConceptKind) -> Arc<Concept> {
        Arc::new(Concept::primitive(ConceptId::new(0, index), kind).unwrap())
    }

    fn observations() -> Vec<f64> {
        (0..20).map(|i| -1.0 + 0.1 * i as f64 + 0.013).collect()
    }

    #[test]
    fn identical_concepts_share_a_cluster() {
        let concepts = vec![
            prim(0, ConceptKind::Square),
            prim(1, ConceptKind::Exp),
            prim(2, ConceptKind::Square),
        ];
        let report = StructureDiscovery::default()
            .discover(&concepts, &observations())
            .unwrap();
        assert_eq!(report.clusters.len(), 3);
        assert!(report.same_cluster(0, 2));
        assert!(!report.same_cluster(0, 1));
        assert_eq!(report.clusters, vec![1, 2, 1]);
        assert_eq!(report.hierarchy[&1], vec![0, 2]);
        assert_eq!(report.linkage.len(), 2);
        assert!(report.linkage[0].distance < 1e-9);
        assert!(report.correlation.is_symmetric());
    }

    #[test]
    fn fewer_than_two_concepts_or_observations() {
        let engine = StructureDiscovery::default();
        let one = vec![prim(0, ConceptKind::Identity)];
        let err = engine.discover(&one, &observations()).unwrap_err();
        assert!(matches!(err, StructureError::CorrelationUndefined { concepts: 1, .. }));

        let two = vec![prim(0, ConceptKind::Identity), prim(1, ConceptKind::Exp)];
        let err = engine.discover(&two, &[0.5]).unwrap_err();
        assert!(matches!(
            err,
            StructureError::CorrelationUndefined { observations: 1, .. }
        ));
    }

    #[test]
    fn constant_output_is_zero_variance() {
        let concepts = vec![prim(0, ConceptKind::Identity), prim(1, ConceptKind::Square)];
        // x² is constant on {-2, 2}
        let err = StructureDiscovery::default()
            .discover(&concepts, &[-2.0, 2.0])
            .unwrap_err();
        assert!(matches!(
            err,
            StructureError::ZeroVariance { concept } if concept == ConceptId::new(0, 1)
        ));
    }

    #[test]
    fn overflow_names_concept_and_observation() {
        let concepts = vec![prim(0, ConceptKind::Identity), prim(1, ConceptKind::Exp)];
        let err = StructureDiscovery::default()
            .discover(&concepts, &[0.0, 1.0, 800.0])
            .unwrap_err();
        assert!(matches!(
            err,
            StructureError::NonFinite { concept, observation: 2, .. } if concept == ConceptId::new(0, 1)
        ));
    }

    #[test]
    fn near_overflow_outputs_still_cluster() {
        let concepts = vec![
            prim(0, ConceptKind::Identity),
            prim(1, ConceptKind::Exp),
            prim(2, ConceptKind::Identity),
        ];
        let engine = StructureDiscovery::default();
        // exp reaches ~8e307 here; shifting x only rescales exp(x)
        let shifted = engine.discover(&concepts, &[700.0, 705.0, 709.0]).unwrap();
        let base = engine.discover(&concepts, &[0.0, 5.0, 9.0]).unwrap();

        assert_eq!(shifted.clusters, base.clusters);
        for (a, b) in shifted
            .correlation
            .rows()
            .iter()
            .flatten()
            .zip(base.correlation.rows().iter().flatten())
        {
            assert!(a.is_finite());
            assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
        }
    }

    #[test]
    fn tiny_threshold_keeps_only_duplicates() {
        let concepts = vec![
            prim(0, ConceptKind::Identity),
            prim(1, ConceptKind::Identity),
            prim(2, ConceptKind::Exp),
            prim(3, ConceptKind::Square),
        ];
        let engine = StructureDiscovery::new(StructureConfig {
            threshold: 1e-9,
            ..StructureConfig::default()
        })
        .unwrap();
        let report = engine.discover(&concepts, &observations()).unwrap();
        assert_eq!(report.clusters, vec![1, 1, 2, 3]);
        assert_eq!(report.num_clusters(), 3);
        assert_eq!(
            report.members(1),
            vec![ConceptId::new(0, 0), ConceptId::new(0, 1)]
        );
    }

    #[test]
    fn negative_threshold_is_rejected() {
        assert!(StructureDiscovery::new(StructureConfig {
            threshold: -0.5,
            ..StructureConfig::default()
        })
        .is_err());
    }
}
