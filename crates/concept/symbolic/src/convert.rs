//! Concept → symbolic expression in the free variable `x`.

use concept_types::{Concept, ConceptKind, LOG_EPSILON};

use crate::expr::{Expr, VAR};

impl From<&Concept> for Expr {
    fn from(concept: &Concept) -> Self {
        let parts = || concept.components().iter().map(|c| Expr::from(c.as_ref()));
        match concept.kind() {
            ConceptKind::Identity => Expr::x(),
            ConceptKind::Square => Expr::pow(Expr::x(), Expr::num(2.0)),
            ConceptKind::Exp => Expr::exp(Expr::x()),
            ConceptKind::Log => Expr::log(Expr::add(vec![
                Expr::abs(Expr::x()),
                Expr::num(LOG_EPSILON),
            ])),
            ConceptKind::Sum => Expr::add(parts().collect()),
            ConceptKind::Product => Expr::mul(parts().collect()),
            ConceptKind::Compose => match concept.components() {
                [outer, inner, ..] => {
                    Expr::from(outer.as_ref()).substitute(VAR, &Expr::from(inner.as_ref()))
                }
                [single] => Expr::from(single.as_ref()),
                [] => Expr::x(),
            },
        }
    }
}

/// Symbolic form of `concept`, unsimplified.
pub fn concept_expression(concept: &Concept) -> Expr {
    Expr::from(concept)
}
