//! Level-ordered concept population.
//!
//! Levels are appended strictly in order. Once a level is pushed it is
//! frozen: later levels hold `Arc` back-references into it and nothing
//! hands out mutable access.

use std::sync::Arc;

use serde::Serialize;

use crate::concept::{Concept, ConceptId};
use crate::error::{ConceptError, ConceptResult};

/// Concepts grouped by level (outer index = level, inner = position).
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConceptPopulation {
    levels: Vec<Vec<Arc<Concept>>>,
}

impl ConceptPopulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next level.
    ///
    /// Every concept must carry the id `(next_level, position)` and every
    /// component must be the very instance stored at the referenced slot of
    /// the level below.
    pub fn push_level(&mut self, concepts: Vec<Concept>) -> ConceptResult<usize> {
        let level = self.levels.len();
        let below = if level == 0 {
            None
        } else {
            Some(&self.levels[level - 1])
        };

        for (position, concept) in concepts.iter().enumerate() {
            let id = concept.id();
            if id.level != level || id.index != position {
                return Err(ConceptError::Misplaced {
                    id,
                    level,
                    position,
                });
            }
            for component in concept.components() {
                let cid = component.id();
                if cid.level + 1 != level {
                    return Err(ConceptError::LevelViolation {
                        id,
                        component: cid,
                        expected: level.saturating_sub(1),
                    });
                }
                match below.and_then(|b| b.get(cid.index)) {
                    Some(stored) if Arc::ptr_eq(stored, component) => {}
                    _ => return Err(ConceptError::UnknownComponent { id, component: cid }),
                }
            }
        }

        self.levels
            .push(concepts.into_iter().map(Arc::new).collect());
        Ok(level)
    }

    pub fn levels(&self) -> &[Vec<Arc<Concept>>] {
        &self.levels
    }

    pub fn level(&self, level: usize) -> Option<&[Arc<Concept>]> {
        self.levels.get(level).map(|l| l.as_slice())
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Total concept count across all levels.
    pub fn len(&self) -> usize {
        self.levels.iter().map(|l| l.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Level-major iteration: level 0 first, in-level order preserved.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Concept>> {
        self.levels.iter().flatten()
    }

    /// Level-major flattening (cheap: clones `Arc`s only).
    pub fn flatten(&self) -> Vec<Arc<Concept>> {
        self.iter().cloned().collect()
    }

    pub fn get(&self, id: ConceptId) -> Option<&Arc<Concept>> {
        self.levels.get(id.level).and_then(|l| l.get(id.index))
    }

    /// Position of `id` in the flattened order.
    pub fn flat_index(&self, id: ConceptId) -> Option<usize> {
        self.get(id)?;
        let before: usize = self.levels[..id.level].iter().map(|l| l.len()).sum();
        Some(before + id.index)
    }

    /// Per-level concept counts.
    pub fn level_sizes(&self) -> Vec<usize> {
        self.levels.iter().map(|l| l.len()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept::ConceptKind;

    fn base_level() -> Vec<Concept> {
        vec![
            Concept::primitive(ConceptId::new(0, 0), ConceptKind::Identity).unwrap(),
            Concept::primitive(ConceptId::new(0, 1), ConceptKind::Square).unwrap(),
        ]
    }

    #[test]
    fn push_and_flatten_level_major() {
        let mut pop = ConceptPopulation::new();
        pop.push_level(base_level()).unwrap();
        let below = pop.level(0).unwrap().to_vec();
        let composite = Concept::composite(
            ConceptId::new(1, 0),
            ConceptKind::Sum,
            vec![below[1].clone(), below[0].clone()],
        )
        .unwrap();
        pop.push_level(vec![composite]).unwrap();

        assert_eq!(pop.len(), 3);
        assert_eq!(pop.num_levels(), 2);
        assert_eq!(pop.level_sizes(), vec![2, 1]);
        let ids: Vec<ConceptId> = pop.iter().map(|c| c.id()).collect();
        assert_eq!(
            ids,
            vec![
                ConceptId::new(0, 0),
                ConceptId::new(0, 1),
                ConceptId::new(1, 0)
            ]
        );
        assert_eq!(pop.flat_index(ConceptId::new(1, 0)), Some(2));
        assert_eq!(pop.flat_index(ConceptId::new(1, 1)), None);
    }

    #[test]
    fn rejects_misplaced_concept() {
        let mut pop = ConceptPopulation::new();
        let wrong = vec![Concept::primitive(ConceptId::new(0, 1), ConceptKind::Exp).unwrap()];
        let err = pop.push_level(wrong).unwrap_err();
        assert!(matches!(err, ConceptError::Misplaced { .. }));
    }

    #[test]
    fn rejects_foreign_component() {
        let mut pop = ConceptPopulation::new();
        pop.push_level(base_level()).unwrap();
        // same id as a stored concept, but a different instance
        let foreign = Arc::new(Concept::primitive(ConceptId::new(0, 0), ConceptKind::Log).unwrap());
        let composite =
            Concept::composite(ConceptId::new(1, 0), ConceptKind::Sum, vec![foreign]).unwrap();
        let err = pop.push_level(vec![composite]).unwrap_err();
        assert!(matches!(err, ConceptError::UnknownComponent { .. }));
    }

    #[test]
    fn rejects_out_of_range_component() {
        let mut pop = ConceptPopulation::new();
        pop.push_level(base_level()).unwrap();
        let ghost = Arc::new(Concept::primitive(ConceptId::new(0, 9), ConceptKind::Exp).unwrap());
        let composite =
            Concept::composite(ConceptId::new(1, 0), ConceptKind::Product, vec![ghost]).unwrap();
        assert!(pop.push_level(vec![composite]).is_err());
    }

    #[test]
    fn empty_levels_are_allowed() {
        let mut pop = ConceptPopulation::new();
        pop.push_level(vec![]).unwrap();
        pop.push_level(vec![]).unwrap();
        assert_eq!(pop.num_levels(), 2);
        assert!(pop.is_empty());
    }

    #[test]
    fn serializes_nested_levels() {
        let mut pop = ConceptPopulation::new();
        pop.push_level(base_level()).unwrap();
        let json = serde_json::to_value(&pop).unwrap();
        assert_eq!(json["levels"][0][1]["kind"], "square");
    }
}
