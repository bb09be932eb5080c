//! The concept node: a tagged unary real function.
//!
//! A concept is either a level-0 primitive (`x`, `x²`, `exp(x)`,
//! `log(|x| + ε)`) or a composite built from concepts of the level directly
//! below it. Composites hold shared back-references (`Arc`) to their
//! components; a concept never owns or mutates what it references.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ConceptError, ConceptResult};
use crate::tensor::Tensor;

/// Guard added to `|x|` before taking the logarithm.
pub const LOG_EPSILON: f64 = 1e-8;

// ── Kind ────────────────────────────────────────────────────────────────

/// Operator tag of a concept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKind {
    /// `x`
    Identity,
    /// `x²`
    Square,
    /// `exp(x)`
    Exp,
    /// `log(|x| + ε)`
    Log,
    /// Elementwise sum of all components.
    Sum,
    /// Elementwise product of all components.
    Product,
    /// First component applied to the output of the second.
    Compose,
}

impl ConceptKind {
    /// Level-0 kinds, in categorical draw order.
    pub const PRIMITIVES: [ConceptKind; 4] = [
        ConceptKind::Identity,
        ConceptKind::Square,
        ConceptKind::Exp,
        ConceptKind::Log,
    ];

    /// Composite operations, in categorical draw order.
    pub const OPERATIONS: [ConceptKind; 3] =
        [ConceptKind::Sum, ConceptKind::Product, ConceptKind::Compose];

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ConceptKind::Identity | ConceptKind::Square | ConceptKind::Exp | ConceptKind::Log
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConceptKind::Identity => "identity",
            ConceptKind::Square => "square",
            ConceptKind::Exp => "exp",
            ConceptKind::Log => "log",
            ConceptKind::Sum => "sum",
            ConceptKind::Product => "product",
            ConceptKind::Compose => "compose",
        }
    }
}

impl fmt::Display for ConceptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ── Identifier ──────────────────────────────────────────────────────────

/// Position of a concept inside its population: `(level, index)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConceptId {
    pub level: usize,
    pub index: usize,
}

impl ConceptId {
    pub fn new(level: usize, index: usize) -> Self {
        Self { level, index }
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}.{}", self.level, self.index)
    }
}

// ── Concept ─────────────────────────────────────────────────────────────

/// An immutable unary real function in the concept hierarchy.
///
/// Serializes with its components flattened to their [`ConceptId`]s, so a
/// serialized population stays linear in the number of concepts.
#[derive(Clone, Debug, Serialize)]
pub struct Concept {
    id: ConceptId,
    kind: ConceptKind,
    #[serde(serialize_with = "serialize_component_ids")]
    components: Vec<Arc<Concept>>,
}

impl Concept {
    /// Build a level-0 primitive.
    pub fn primitive(id: ConceptId, kind: ConceptKind) -> ConceptResult<Self> {
        if !kind.is_primitive() {
            return Err(ConceptError::KindMismatch {
                id,
                kind,
                detail: "primitives must be identity, square, exp or log".into(),
            });
        }
        if id.level != 0 {
            return Err(ConceptError::KindMismatch {
                id,
                kind,
                detail: "primitives live at level 0".into(),
            });
        }
        Ok(Self {
            id,
            kind,
            components: Vec::new(),
        })
    }

    /// Build a composite from concepts of level `id.level - 1`.
    ///
    /// Fails on an empty component list: a sum, product or composition of
    /// nothing is not a concept.
    pub fn composite(
        id: ConceptId,
        kind: ConceptKind,
        components: Vec<Arc<Concept>>,
    ) -> ConceptResult<Self> {
        if kind.is_primitive() {
            return Err(ConceptError::KindMismatch {
                id,
                kind,
                detail: "composites must be sum, product or compose".into(),
            });
        }
        if id.level == 0 {
            return Err(ConceptError::KindMismatch {
                id,
                kind,
                detail: "composites live at level 1 or above".into(),
            });
        }
        if components.is_empty() {
            return Err(ConceptError::DegenerateStructure(format!(
                "composite concept {} ({}) has no components",
                id, kind
            )));
        }
        let expected = id.level - 1;
        if let Some(bad) = components.iter().find(|c| c.id.level != expected) {
            return Err(ConceptError::LevelViolation {
                id,
                component: bad.id,
                expected,
            });
        }
        Ok(Self {
            id,
            kind,
            components,
        })
    }

    pub fn id(&self) -> ConceptId {
        self.id
    }

    pub fn level(&self) -> usize {
        self.id.level
    }

    pub fn kind(&self) -> ConceptKind {
        self.kind
    }

    pub fn components(&self) -> &[Arc<Concept>] {
        &self.components
    }

    /// Ids of the referenced components, in sampled order.
    pub fn component_ids(&self) -> Vec<ConceptId> {
        self.components.iter().map(|c| c.id).collect()
    }

    /// Evaluate at a single point.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self.kind {
            ConceptKind::Identity => x,
            ConceptKind::Square => x * x,
            ConceptKind::Exp => x.exp(),
            ConceptKind::Log => (x.abs() + LOG_EPSILON).ln(),
            ConceptKind::Sum => self.components.iter().map(|c| c.evaluate(x)).sum(),
            ConceptKind::Product => self.components.iter().map(|c| c.evaluate(x)).product(),
            ConceptKind::Compose => match self.components.as_slice() {
                [outer, inner, ..] => outer.evaluate(inner.evaluate(x)),
                [single] => single.evaluate(x),
                // unreachable: `composite` rejects empty component lists
                [] => x,
            },
        }
    }

    /// Evaluate elementwise over a tensor; the result has the input's shape.
    pub fn evaluate_tensor(&self, input: &Tensor) -> Tensor {
        input.map(|x| self.evaluate(x))
    }

    /// Evaluate pointwise over a slice of scalars.
    pub fn evaluate_all(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }

    /// Like [`Concept::evaluate_all`], but fails on the first non-finite output.
    pub fn evaluate_finite(&self, xs: &[f64]) -> ConceptResult<Vec<f64>> {
        xs.iter()
            .enumerate()
            .map(|(position, &x)| {
                let value = self.evaluate(x);
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(ConceptError::NonFinite {
                        concept: self.id,
                        position,
                        value,
                    })
                }
            })
            .collect()
    }

    /// Height of the concept tree (primitives have depth 1).
    pub fn depth(&self) -> usize {
        1 + self
            .components
            .iter()
            .map(|c| c.depth())
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return write!(f, "{} = {}", self.id, self.kind);
        }
        let parts: Vec<String> = self.components.iter().map(|c| c.id.to_string()).collect();
        write!(f, "{} = {}[{}]", self.id, self.kind, parts.join(", "))
    }
}

fn serialize_component_ids<S>(components: &[Arc<Concept>], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(components.iter().map(|c| c.id))
}
