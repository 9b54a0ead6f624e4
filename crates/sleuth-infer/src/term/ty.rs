//! Qualified types.
//!
//! A [`Type`] reads as "these constraints hold ⇒ this term". The constraints
//! form a set; they are kept sorted (and deduplicated) so that two types with
//! the same constraints compare equal regardless of insertion order.

use super::{Atom, Term};

/// A term qualified by a set of constraint terms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Type {
    constraints: Vec<Term>,
    term: Term,
}

impl Type {
    /// Builds a type, putting the constraints in canonical order.
    pub fn new(constraints: impl IntoIterator<Item = Term>, term: Term) -> Self {
        let mut constraints: Vec<Term> = constraints.into_iter().collect();
        constraints.sort();
        constraints.dedup();
        Self { constraints, term }
    }

    /// An unconstrained type.
    pub fn unconstrained(term: Term) -> Self {
        Self {
            constraints: Vec::new(),
            term,
        }
    }

    /// `true => name`.
    pub fn atom(name: impl Into<Atom>) -> Self {
        Self::unconstrained(Term::atom(name))
    }

    /// `true => @name`.
    pub fn var(name: impl Into<Atom>) -> Self {
        Self::unconstrained(Term::var(name))
    }

    /// `true => f (x)`.
    pub fn apply(f: Term, x: Term) -> Self {
        Self::unconstrained(Term::apply(f, x))
    }

    /// The constraints, in canonical order.
    pub fn constraints(&self) -> &[Term] {
        &self.constraints
    }

    /// The qualified term.
    pub fn term(&self) -> &Term {
        &self.term
    }

    /// Rebuilds the type with every term (constraints first, then the
    /// qualified term) passed through `f`, re-establishing canonical order.
    pub fn map_terms(&self, mut f: impl FnMut(&Term) -> Term) -> Type {
        let constraints: Vec<Term> = self.constraints.iter().map(&mut f).collect();
        let term = f(&self.term);
        Type::new(constraints, term)
    }
}
