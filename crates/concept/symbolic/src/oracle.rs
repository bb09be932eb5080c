//! Theorem oracles.
//!
//! A [`TheoremOracle`] decides equality claims. The bundled
//! [`SampleOracle`] first compares the simplified sides structurally and
//! falls back to numeric evaluation on seeded sample points, so it can
//! refute a claim but only ever calls an unproven one plausible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SymbolicError, SymbolicResult};
use crate::reasoning::Theorem;

/// Default number of numeric sample points.
pub const DEFAULT_ORACLE_SAMPLES: usize = 16;

/// Default relative tolerance for numeric agreement.
pub const DEFAULT_ORACLE_TOLERANCE: f64 = 1e-9;

/// Outcome of checking a claim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProofOutcome {
    /// Both sides simplify to the same expression, or the claim is an axiom.
    Proved,
    /// Sides agree on every sample point where both are finite.
    Plausible { points: usize },
    /// Sides disagree at `witness`.
    Refuted { witness: f64, lhs: f64, rhs: f64 },
}

impl ProofOutcome {
    pub fn is_refuted(&self) -> bool {
        matches!(self, ProofOutcome::Refuted { .. })
    }
}

/// Decides equality claims.
pub trait TheoremOracle {
    /// Check `theorem`, treating each of `axioms` as already established.
    fn prove(&self, theorem: &Theorem, axioms: &[Theorem]) -> SymbolicResult<ProofOutcome>;

    /// Name of this oracle (for logs).
    fn name(&self) -> &str;
}

/// Sampling parameters for [`SampleOracle`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub samples: usize,
    pub low: f64,
    pub high: f64,
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_ORACLE_SAMPLES,
            low: -2.0,
            high: 2.0,
            tolerance: DEFAULT_ORACLE_TOLERANCE,
            seed: 0,
        }
    }
}

impl OracleConfig {
    pub fn validate(&self) -> SymbolicResult<()> {
        if !(self.low.is_finite() && self.high.is_finite() && self.low < self.high) {
            return Err(SymbolicError::InvalidConfig(format!(
                "sample range [{}, {}) is empty or unbounded",
                self.low, self.high
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SymbolicError::InvalidConfig(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Structural check, then numeric sampling.
#[derive(Clone, Debug, Default)]
pub struct SampleOracle {
    config: OracleConfig,
}

impl SampleOracle {
    pub fn new(config: OracleConfig) -> SymbolicResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl TheoremOracle for SampleOracle {
    fn prove(&self, theorem: &Theorem, axioms: &[Theorem]) -> SymbolicResult<ProofOutcome> {
        let residual = theorem.residual();
        if residual.is_zero() || axioms.iter().any(|a| a.residual() == residual) {
            return Ok(ProofOutcome::Proved);
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut points = 0;
        for _ in 0..self.config.samples {
            let x = rng.gen_range(self.config.low..self.config.high);
            let lhs = theorem.lhs.evaluate_at(x)?;
            let rhs = theorem.rhs.evaluate_at(x)?;
            if !(lhs.is_finite() && rhs.is_finite()) {
                continue;
            }
            points += 1;
            if (lhs - rhs).abs() > self.config.tolerance * (1.0 + lhs.abs() + rhs.abs()) {
                debug!(claim = %theorem, witness = x, "claim refuted");
                return Ok(ProofOutcome::Refuted { witness: x, lhs, rhs });
            }
        }
        Ok(ProofOutcome::Plausible { points })
    }

    fn name(&self) -> &str {
        "sample"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;

    fn x() -> Expr {
        Expr::x()
    }

    #[test]
    fn reflexive_claim_is_proved() {
        let t = Theorem::new(Expr::exp(x()), Expr::exp(x()));
        let outcome = SampleOracle::default().prove(&t, &[]).unwrap();
        assert_eq!(outcome, ProofOutcome::Proved);
    }

    #[test]
    fn false_claim_is_refuted() {
        let t = Theorem::new(x(), Expr::pow(x(), Expr::num(2.0)));
        let outcome = SampleOracle::default().prove(&t, &[]).unwrap();
        assert!(outcome.is_refuted());
    }

    #[test]
    fn numerically_true_claim_is_plausible() {
        // log(exp(x)) = x is not simplified away but holds everywhere
        let t = Theorem::new(Expr::log(Expr::exp(x())), x());
        let outcome = SampleOracle::default().prove(&t, &[]).unwrap();
        assert_eq!(outcome, ProofOutcome::Plausible { points: 16 });
    }

    #[test]
    fn axiom_proves_matching_claim() {
        let t = Theorem::new(Expr::log(Expr::exp(x())), x());
        let outcome = SampleOracle::default().prove(&t, &[t.clone()]).unwrap();
        assert_eq!(outcome, ProofOutcome::Proved);
    }

    #[test]
    fn free_symbols_other_than_x_fail() {
        let t = Theorem::new(Expr::sym("y"), x());
        assert!(SampleOracle::default().prove(&t, &[]).is_err());
    }

    #[test]
    fn empty_range_rejected() {
        assert!(SampleOracle::new(OracleConfig {
            low: 1.0,
            high: 1.0,
            ..OracleConfig::default()
        })
        .is_err());
    }
}
