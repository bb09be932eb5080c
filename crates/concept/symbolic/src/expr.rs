//! Symbolic expression AST over named real symbols.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SymbolicError, SymbolicResult};

/// The free variable every concept is expressed in.
pub const VAR: &str = "x";

/// A real-valued symbolic expression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "snake_case")]
pub enum Expr {
    Num(f64),
    Sym(String),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Exp(Box<Expr>),
    Log(Box<Expr>),
    Abs(Box<Expr>),
}

impl Expr {
    // ── Constructors ────────────────────────────────────────────────────

    /// The free variable `x`.
    pub fn x() -> Self {
        Expr::Sym(VAR.to_string())
    }

    pub fn sym(name: impl Into<String>) -> Self {
        Expr::Sym(name.into())
    }

    pub fn num(value: f64) -> Self {
        Expr::Num(value)
    }

    pub fn add(terms: Vec<Expr>) -> Self {
        Expr::Add(terms)
    }

    pub fn mul(factors: Vec<Expr>) -> Self {
        Expr::Mul(factors)
    }

    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Expr::Pow(Box::new(base), Box::new(exponent))
    }

    pub fn exp(arg: Expr) -> Self {
        Expr::Exp(Box::new(arg))
    }

    pub fn log(arg: Expr) -> Self {
        Expr::Log(Box::new(arg))
    }

    pub fn abs(arg: Expr) -> Self {
        Expr::Abs(Box::new(arg))
    }

    pub fn neg(arg: Expr) -> Self {
        Expr::Mul(vec![Expr::Num(-1.0), arg])
    }

    /// `a - b`, as `a + (-1)·b`.
    pub fn sub(a: Expr, b: Expr) -> Self {
        Expr::Add(vec![a, Expr::neg(b)])
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Num(v) if *v == 0.0)
    }

    /// Prints without surrounding parentheses in any position.
    fn is_atom(&self) -> bool {
        match self {
            Expr::Num(v) => *v >= 0.0,
            Expr::Sym(_) | Expr::Exp(_) | Expr::Log(_) | Expr::Abs(_) => true,
            Expr::Add(_) | Expr::Mul(_) | Expr::Pow(..) => false,
        }
    }

    /// Number of nodes in the expression tree.
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Num(_) | Expr::Sym(_) => 1,
            Expr::Add(items) | Expr::Mul(items) => {
                1 + items.iter().map(Expr::node_count).sum::<usize>()
            }
            Expr::Pow(b, e) => 1 + b.node_count() + e.node_count(),
            Expr::Exp(a) | Expr::Log(a) | Expr::Abs(a) => 1 + a.node_count(),
        }
    }

    /// Names of all symbols occurring in the expression.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Num(_) => {}
            Expr::Sym(name) => {
                out.insert(name.clone());
            }
            Expr::Add(items) | Expr::Mul(items) => {
                items.iter().for_each(|i| i.collect_symbols(out));
            }
            Expr::Pow(b, e) => {
                b.collect_symbols(out);
                e.collect_symbols(out);
            }
            Expr::Exp(a) | Expr::Log(a) | Expr::Abs(a) => a.collect_symbols(out),
        }
    }

    // ── Transformations ─────────────────────────────────────────────────

    /// Replace every occurrence of symbol `var` with `replacement`.
    pub fn substitute(&self, var: &str, replacement: &Expr) -> Expr {
        let sub = |e: &Expr| Box::new(e.substitute(var, replacement));
        match self {
            Expr::Sym(name) if name == var => replacement.clone(),
            Expr::Num(_) | Expr::Sym(_) => self.clone(),
            Expr::Add(items) => Expr::Add(items.iter().map(|i| i.substitute(var, replacement)).collect()),
            Expr::Mul(items) => Expr::Mul(items.iter().map(|i| i.substitute(var, replacement)).collect()),
            Expr::Pow(b, e) => Expr::Pow(sub(b.as_ref()), sub(e.as_ref())),
            Expr::Exp(a) => Expr::Exp(sub(a.as_ref())),
            Expr::Log(a) => Expr::Log(sub(a.as_ref())),
            Expr::Abs(a) => Expr::Abs(sub(a.as_ref())),
        }
    }

    // ── Evaluation ──────────────────────────────────────────────────────

    /// Evaluate with symbol values from `env`.
    ///
    /// Integer exponents use repeated multiplication so `x^2` agrees
    /// bit-for-bit with `x * x`.
    pub fn evaluate(&self, env: &BTreeMap<String, f64>) -> SymbolicResult<f64> {
        Ok(match self {
            Expr::Num(v) => *v,
            Expr::Sym(name) => *env
                .get(name)
                .ok_or_else(|| SymbolicError::UnboundSymbol(name.clone()))?,
            Expr::Add(items) => {
                let mut acc = 0.0;
                for item in items {
                    acc += item.evaluate(env)?;
                }
                acc
            }
            Expr::Mul(items) => {
                let mut acc = 1.0;
                for item in items {
                    acc *= item.evaluate(env)?;
                }
                acc
            }
            Expr::Pow(b, e) => {
                let base = b.evaluate(env)?;
                let exponent = e.evaluate(env)?;
                if exponent.fract() == 0.0 && exponent.abs() <= i32::MAX as f64 {
                    base.powi(exponent as i32)
                } else {
                    base.powf(exponent)
                }
            }
            Expr::Exp(a) => a.evaluate(env)?.exp(),
            Expr::Log(a) => a.evaluate(env)?.ln(),
            Expr::Abs(a) => a.evaluate(env)?.abs(),
        })
    }

    /// Evaluate an expression in the single variable `x`.
    pub fn evaluate_at(&self, x: f64) -> SymbolicResult<f64> {
        let mut env = BTreeMap::new();
        env.insert(VAR.to_string(), x);
        self.evaluate(&env)
    }

    /// If this expression reads as negative (`-3`, `-1·y`, `-2·y·z`),
    /// return its positive counterpart.
    fn negated_magnitude(&self) -> Option<Expr> {
        match self {
            Expr::Num(v) if *v < 0.0 => Some(Expr::Num(-v)),
            Expr::Mul(items) => match items.split_first() {
                Some((Expr::Num(c), rest)) if *c < 0.0 && !rest.is_empty() => {
                    let mut factors = Vec::with_capacity(items.len());
                    if *c != -1.0 {
                        factors.push(Expr::Num(-c));
                    }
                    factors.extend(rest.iter().cloned());
                    Some(if factors.len() == 1 {
                        factors.remove(0)
                    } else {
                        Expr::Mul(factors)
                    })
                }
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Num(v)
    }
}

// ── Display ─────────────────────────────────────────────────────────────

fn write_wrapped(f: &mut fmt::Formatter<'_>, e: &Expr, wrap: bool) -> fmt::Result {
    if wrap {
        write!(f, "({})", e)
    } else {
        write!(f, "{}", e)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(v) => write!(f, "{}", v),
            Expr::Sym(name) => write!(f, "{}", name),
            Expr::Add(terms) => {
                if terms.is_empty() {
                    return write!(f, "0");
                }
                for (i, term) in terms.iter().enumerate() {
                    match (i, term.negated_magnitude()) {
                        (0, _) => write_wrapped(f, term, matches!(term, Expr::Add(_)))?,
                        (_, Some(pos)) => {
                            write!(f, " - ")?;
                            write_wrapped(f, &pos, matches!(pos, Expr::Add(_)))?;
                        }
                        (_, None) => {
                            write!(f, " + ")?;
                            write_wrapped(f, term, matches!(term, Expr::Add(_)))?;
                        }
                    }
                }
                Ok(())
            }
            Expr::Mul(factors) => {
                if factors.is_empty() {
                    return write!(f, "1");
                }
                let mut rest = factors.as_slice();
                if let [Expr::Num(c), tail @ ..] = factors.as_slice() {
                    if *c == -1.0 && !tail.is_empty() {
                        write!(f, "-")?;
                        rest = tail;
                    }
                }
                for (i, factor) in rest.iter().enumerate() {
                    if i > 0 {
                        write!(f, "*")?;
                    }
                    let wrap = matches!(factor, Expr::Add(_) | Expr::Mul(_))
                        || matches!(factor, Expr::Num(v) if *v < 0.0 && i > 0);
                    write_wrapped(f, factor, wrap)?;
                }
                Ok(())
            }
            Expr::Pow(b, e) => {
                write_wrapped(f, b, !b.is_atom())?;
                write!(f, "^")?;
                write_wrapped(f, e, !e.is_atom())
            }
            Expr::Exp(a) => write!(f, "exp({})", a),
            Expr::Log(a) => write!(f, "log({})", a),
            Expr::Abs(a) => write!(f, "abs({})", a),
        }
    }
}
