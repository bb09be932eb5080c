//! Algebraic simplification to a canonical form.
//!
//! Rules, applied bottom-up:
//! - nested sums and products are flattened
//! - numeric constants are folded
//! - like terms are collected (`2·y + 3·y → 5·y`, `y - y → 0`)
//! - equal factors are merged into powers (`y·y → y^2`)
//! - identity elements are dropped (`y + 0`, `1·y`, `y^1`)
//! - a numeric factor on a single sum is distributed (`-1·(a + b) → -a - b`)
//! - sum and product operands are sorted by their printed form
//!
//! The result is canonical enough that two structurally equal concepts
//! always simplify to equal expressions, so their difference folds to 0.

use crate::expr::Expr;

/// Simplify `expr`.
pub fn simplify(expr: &Expr) -> Expr {
    match expr {
        Expr::Num(_) | Expr::Sym(_) => expr.clone(),
        Expr::Add(terms) => simplify_add(terms.iter().map(simplify).collect()),
        Expr::Mul(factors) => simplify_mul(factors.iter().map(simplify).collect()),
        Expr::Pow(b, e) => simplify_pow(simplify(b), simplify(e)),
        Expr::Exp(a) => match simplify(a) {
            Expr::Num(v) if v.exp().is_finite() => Expr::Num(v.exp()),
            arg => Expr::exp(arg),
        },
        Expr::Log(a) => match simplify(a) {
            Expr::Num(v) if v > 0.0 => Expr::Num(v.ln()),
            arg => Expr::log(arg),
        },
        Expr::Abs(a) => match simplify(a) {
            Expr::Num(v) => Expr::Num(v.abs()),
            arg @ (Expr::Abs(_) | Expr::Exp(_)) => arg,
            arg @ Expr::Pow(..) if is_even_power(&arg) => arg,
            arg => Expr::abs(arg),
        },
    }
}

fn is_even_power(e: &Expr) -> bool {
    match e {
        Expr::Pow(_, exp) => matches!(**exp, Expr::Num(n) if n.fract() == 0.0 && (n / 2.0).fract() == 0.0),
        _ => false,
    }
}

fn sort_key(e: &Expr) -> String {
    e.to_string()
}

/// Split a term into its numeric coefficient and the remaining factor.
fn split_coefficient(term: Expr) -> (f64, Expr) {
    match term {
        Expr::Mul(mut factors) => match factors.first() {
            Some(Expr::Num(c)) => {
                let c = *c;
                factors.remove(0);
                let rest = if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Expr::Mul(factors)
                };
                (c, rest)
            }
            _ => (1.0, Expr::Mul(factors)),
        },
        other => (1.0, other),
    }
}

fn with_coefficient(c: f64, rest: Expr) -> Expr {
    if c == 1.0 {
        return rest;
    }
    let mut factors = vec![Expr::Num(c)];
    match rest {
        Expr::Mul(fs) => factors.extend(fs),
        other => factors.push(other),
    }
    Expr::Mul(factors)
}

fn simplify_add(terms: Vec<Expr>) -> Expr {
    let mut flat = Vec::with_capacity(terms.len());
    for term in terms {
        match term {
            Expr::Add(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }

    let mut constant = 0.0;
    let mut collected: Vec<(Expr, f64)> = Vec::new();
    for term in flat {
        if let Expr::Num(v) = term {
            constant += v;
            continue;
        }
        let (c, rest) = split_coefficient(term);
        match collected.iter_mut().find(|(r, _)| *r == rest) {
            Some((_, acc)) => *acc += c,
            None => collected.push((rest, c)),
        }
    }

    let mut out: Vec<Expr> = collected
        .into_iter()
        .filter(|(_, c)| *c != 0.0)
        .map(|(rest, c)| with_coefficient(c, rest))
        .collect();
    out.sort_by_key(sort_key);
    if constant != 0.0 {
        out.push(Expr::Num(constant));
    }

    match out.len() {
        0 => Expr::Num(0.0),
        1 => out.remove(0),
        _ => Expr::Add(out),
    }
}

fn simplify_mul(factors: Vec<Expr>) -> Expr {
    let mut flat = Vec::with_capacity(factors.len());
    for factor in factors {
        match factor {
            Expr::Mul(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }

    let mut coefficient = 1.0;
    let mut powers: Vec<(Expr, Expr)> = Vec::new();
    for factor in flat {
        let (base, exponent) = match factor {
            Expr::Num(v) => {
                coefficient *= v;
                continue;
            }
            Expr::Pow(b, e) => (*b, *e),
            other => (other, Expr::Num(1.0)),
        };
        match powers.iter_mut().find(|(b, _)| *b == base) {
            Some((_, acc)) => *acc = simplify_add(vec![acc.clone(), exponent]),
            None => powers.push((base, exponent)),
        }
    }

    if coefficient == 0.0 {
        return Expr::Num(0.0);
    }

    let mut out: Vec<Expr> = powers
        .into_iter()
        .filter_map(|(base, exponent)| match simplify_pow(base, exponent) {
            Expr::Num(v) => {
                coefficient *= v;
                None
            }
            other => Some(other),
        })
        .collect();
    out.sort_by_key(sort_key);

    if out.is_empty() {
        return Expr::Num(coefficient);
    }
    if out.len() == 1 {
        if coefficient == 1.0 {
            return out.remove(0);
        }
        if let Expr::Add(terms) = &out[0] {
            return simplify_add(
                terms
                    .iter()
                    .map(|t| simplify_mul(vec![Expr::Num(coefficient), t.clone()]))
                    .collect(),
            );
        }
    }
    with_coefficient(coefficient, Expr::Mul(out))
}

fn simplify_pow(base: Expr, exponent: Expr) -> Expr {
    match (base, exponent) {
        (_, Expr::Num(e)) if e == 0.0 => Expr::Num(1.0),
        (b, Expr::Num(e)) if e == 1.0 => b,
        (Expr::Num(b), _) if b == 1.0 => Expr::Num(1.0),
        (Expr::Num(b), Expr::Num(e)) if b.powf(e).is_finite() => Expr::Num(b.powf(e)),
        (Expr::Pow(inner, e1), Expr::Num(e2)) if e2.fract() == 0.0 => match *e1 {
            Expr::Num(e1) => simplify_pow(*inner, Expr::Num(e1 * e2)),
            e1 => Expr::pow(Expr::Pow(inner, Box::new(e1)), Expr::Num(e2)),
        },
        (b, e) => Expr::pow(b, e),
    }
}
