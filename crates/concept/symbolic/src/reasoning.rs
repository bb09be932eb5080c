//! Symbolic reasoning over concept expressions.

use std::fmt;
use std::sync::Arc;

use rand::seq::index::sample;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use concept_types::Concept;

use crate::error::{SymbolicError, SymbolicResult};
use crate::expr::{Expr, VAR};
use crate::simplify::simplify;

/// Symbol introduced by [`generalize_concept`].
pub const GENERALIZATION_VAR: &str = "y";

/// Default upper bound on concepts per generated theorem side.
pub const DEFAULT_MAX_THEOREM_TERMS: usize = 3;

// ── Theorem ─────────────────────────────────────────────────────────────

/// An equality claim `lhs = rhs`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theorem {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Theorem {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Self { lhs, rhs }
    }

    /// `lhs - rhs`, simplified.
    pub fn residual(&self) -> Expr {
        simplify(&Expr::sub(self.lhs.clone(), self.rhs.clone()))
    }
}

impl fmt::Display for Theorem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

// ── Rules ───────────────────────────────────────────────────────────────

/// Substitute `x := expression` in `concept` and simplify.
pub fn apply_rule(concept: &Expr, expression: &Expr) -> Expr {
    simplify(&concept.substitute(VAR, expression))
}

/// The claim `Σ concepts = Σ concepts`.
pub fn generate_theorem(concepts: &[Expr]) -> SymbolicResult<Theorem> {
    if concepts.is_empty() {
        return Err(SymbolicError::EmptyClaim);
    }
    let side = Expr::add(concepts.to_vec());
    Ok(Theorem::new(side.clone(), side))
}

/// Simplified pairwise differences `eᵢ - eⱼ` (i < j) that are not
/// identically zero.
pub fn discover_patterns(expressions: &[Expr]) -> Vec<Expr> {
    let mut patterns = Vec::new();
    for (i, a) in expressions.iter().enumerate() {
        for b in &expressions[i + 1..] {
            let diff = simplify(&Expr::sub(a.clone(), b.clone()));
            if !diff.is_zero() {
                patterns.push(diff);
            }
        }
    }
    debug!(
        expressions = expressions.len(),
        patterns = patterns.len(),
        "patterns discovered"
    );
    patterns
}

/// Substitute `x := x + y`.
pub fn generalize_concept(concept: &Expr) -> Expr {
    concept.substitute(
        VAR,
        &Expr::add(vec![Expr::x(), Expr::sym(GENERALIZATION_VAR)]),
    )
}

// ── Theorem Generator ───────────────────────────────────────────────────

/// Draws equality claims over random subsets of a concept list.
#[derive(Clone, Debug)]
pub struct TheoremGenerator {
    pub max_terms: usize,
}

impl Default for TheoremGenerator {
    fn default() -> Self {
        Self {
            max_terms: DEFAULT_MAX_THEOREM_TERMS,
        }
    }
}

impl TheoremGenerator {
    pub fn new(max_terms: usize) -> Self {
        Self { max_terms }
    }

    /// Draw `count` theorems, each over a random subset of `concepts` of
    /// size `1..=max_terms` (without replacement, in flattened order).
    pub fn random_theorems(
        &self,
        concepts: &[Arc<Concept>],
        count: usize,
        rng: &mut dyn RngCore,
    ) -> SymbolicResult<Vec<Theorem>> {
        let limit = self.max_terms.min(concepts.len());
        if limit == 0 {
            return if count == 0 {
                Ok(Vec::new())
            } else {
                Err(SymbolicError::EmptyClaim)
            };
        }

        let mut theorems = Vec::with_capacity(count);
        for _ in 0..count {
            let size = rng.gen_range(1..=limit);
            let mut picked = sample(&mut *rng, concepts.len(), size).into_vec();
            picked.sort_unstable();
            let exprs: Vec<Expr> = picked
                .into_iter()
                .map(|i| Expr::from(concepts[i].as_ref()))
                .collect();
            theorems.push(generate_theorem(&exprs)?);
        }
        Ok(theorems)
    }
}
