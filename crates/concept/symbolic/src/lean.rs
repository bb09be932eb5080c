//! Lean source export.
//!
//! Emits a definition `concept (x : ℝ) : ℝ` for an expression together with
//! a placeholder property theorem closed by `sorry`.

use crate::error::{SymbolicError, SymbolicResult};
use crate::expr::Expr;
use crate::simplify::simplify;

/// Module preamble of every exported file.
pub const LEAN_HEADER: &str = "import data.real.basic\n\nopen real\n\n";

/// Name of the exported definition.
pub const LEAN_DEF_NAME: &str = "concept";

/// Name of the placeholder theorem.
pub const LEAN_THEOREM_NAME: &str = "concept_property";

/// Translates expressions into Lean source.
#[derive(Clone, Debug, Default)]
pub struct LeanExporter {
    /// Simplify before translating.
    pub simplify: bool,
}

impl LeanExporter {
    pub fn new(simplify: bool) -> Self {
        Self { simplify }
    }

    /// Translate a single expression into a Lean term.
    pub fn term(&self, expr: &Expr) -> SymbolicResult<String> {
        Ok(match expr {
            Expr::Num(v) if v.is_finite() => format!("{}", v),
            Expr::Num(v) => {
                return Err(SymbolicError::Export(format!(
                    "numeral {} has no real counterpart",
                    v
                )))
            }
            Expr::Sym(name) => name.clone(),
            Expr::Add(terms) => self.joined(terms, " + ")?,
            Expr::Mul(factors) => self.joined(factors, " * ")?,
            Expr::Pow(b, e) => format!("({}) ^ ({})", self.term(b)?, self.term(e)?),
            Expr::Exp(a) => format!("exp ({})", self.term(a)?),
            Expr::Log(a) => format!("log ({})", self.term(a)?),
            Expr::Abs(a) => format!("abs ({})", self.term(a)?),
        })
    }

    fn joined(&self, items: &[Expr], sep: &str) -> SymbolicResult<String> {
        let parts = items
            .iter()
            .map(|i| self.term(i).map(|t| format!("({})", t)))
            .collect::<SymbolicResult<Vec<_>>>()?;
        Ok(parts.join(sep))
    }

    /// Full Lean source for `expr`.
    pub fn concept_source(&self, expr: &Expr) -> SymbolicResult<String> {
        let expr = if self.simplify {
            simplify(expr)
        } else {
            expr.clone()
        };

        let mut out = String::from(LEAN_HEADER);
        let body = self.term(&expr)?;
        out.push_str(&format!("def {} (x : ℝ) : ℝ :=\n", LEAN_DEF_NAME));
        out.push_str(&format!("  {}\n\n", body));
        out.push_str(&format!(
            "theorem {} : ∀ x, {} x = x :=\n",
            LEAN_THEOREM_NAME, LEAN_DEF_NAME
        ));
        out.push_str("begin\n  sorry\nend");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::x()
    }

    #[test]
    fn translation_table() {
        let ex = LeanExporter::default();
        assert_eq!(ex.term(&x()).unwrap(), "x");
        assert_eq!(ex.term(&Expr::num(2.0)).unwrap(), "2");
        assert_eq!(
            ex.term(&Expr::add(vec![x(), Expr::exp(x())])).unwrap(),
            "(x) + (exp (x))"
        );
        assert_eq!(
            ex.term(&Expr::mul(vec![x(), Expr::log(x())])).unwrap(),
            "(x) * (log (x))"
        );
        assert_eq!(
            ex.term(&Expr::pow(x(), Expr::num(2.0))).unwrap(),
            "(x) ^ (2)"
        );
        assert_eq!(ex.term(&Expr::abs(x())).unwrap(), "abs (x)");
        assert!(ex.term(&Expr::num(f64::INFINITY)).is_err());
    }

    #[test]
    fn full_source_layout() {
        let src = LeanExporter::default()
            .concept_source(&Expr::pow(x(), Expr::num(2.0)))
            .unwrap();
        assert_eq!(
            src,
            "import data.real.basic\n\nopen real\n\n\
             def concept (x : ℝ) : ℝ :=\n  (x) ^ (2)\n\n\
             theorem concept_property : ∀ x, concept x = x :=\n\
             begin\n  sorry\nend"
        );
    }

    #[test]
    fn simplifying_exporter_folds_first() {
        let e = Expr::add(vec![x(), Expr::num(0.0)]);
        let src = LeanExporter::new(true).concept_source(&e).unwrap();
        assert!(src.contains(":=\n  x\n"));
    }
}
