//! Free values and alpha-equivalence.
//!
//! A [`Free`] wraps a term or type whose variable names are placeholders: the
//! `a` in `free(true => List (@a))` only becomes a concrete unification
//! variable once a [`Scope`](crate::scope::Scope) resolves it. Free values are
//! therefore never compared by literal variable name; they are compared up to
//! consistent renaming through [`Free::equivalent`].
//!
//! # Canonical form
//!
//! Canonicalization renames every distinct variable, in first-occurrence
//! order, to `var_1`, `var_2`, ... The qualified term is visited first, then
//! the constraints in their sorted order.
//!
//! ```
//! use sleuth_infer::{Free, Term, Type};
//!
//! let a = Free::new(Type::apply(Term::atom("List"), Term::var("a")));
//! let b = Free::new(Type::apply(Term::atom("List"), Term::var("zz")));
//! assert!(a.equivalent(&b));
//! ```

use fxhash::FxHashMap;

use super::{Atom, Term, Type};

/// A term or type that has not been resolved into any scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Free<T>(T);

impl<T> Free<T> {
    /// Marks `value` as free.
    pub fn new(value: T) -> Self {
        Free(value)
    }

    /// The wrapped value with its placeholder names.
    ///
    /// Comparing two of these directly is almost never right; use
    /// [`Free::equivalent`] or resolve them through a scope.
    pub fn unresolved(&self) -> &T {
        &self.0
    }

    /// Unwraps the value.
    pub fn into_unresolved(self) -> T {
        self.0
    }
}

impl Free<Type> {
    /// The maximally general type, `true => @any`.
    pub fn most_general() -> Self {
        Free(Type::var("any"))
    }

    /// Alpha-renamed copy in canonical form.
    pub fn canonicalize(&self) -> Self {
        Free(canonical_type(&self.0))
    }

    /// True when both types are equal up to consistent variable renaming.
    ///
    /// Decided by comparing canonical forms, so it can answer `false` for
    /// two types that are alpha-equivalent only through a permutation of
    /// variables that occur in constraints but not in the term, such as
    /// `D @a, D @b, E @a => Unit` and `D @a, D @b, E @b => Unit`. The engine
    /// then treats the type as changed and wakes the clue's dependents once
    /// more; a rule set that keeps producing such pairs may not settle.
    pub fn equivalent(&self, other: &Self) -> bool {
        self.canonicalize() == other.canonicalize()
    }
}

impl Free<Term> {
    /// Alpha-renamed copy in canonical form.
    pub fn canonicalize(&self) -> Self {
        Free(Canonicalizer::default().term(&self.0))
    }

    /// True when both terms are equal up to consistent variable renaming.
    pub fn equivalent(&self, other: &Self) -> bool {
        self.canonicalize() == other.canonicalize()
    }
}

/// Renaming can reorder constraints that differ only in variables absent from
/// the term, which changes first-occurrence order, so one renaming pass is not
/// always stable.
/// Renaming is a deterministic map over finitely many states: iterate it until
/// a state repeats and pick the least state on the cycle. Any member of that
/// cycle leads back to the same pick, which makes the result idempotent.
fn canonical_type(ty: &Type) -> Type {
    let mut seen: Vec<Type> = Vec::new();
    let mut current = Canonicalizer::default().ty(ty);
    while !seen.contains(&current) {
        let next = Canonicalizer::default().ty(&current);
        seen.push(current);
        current = next;
    }
    let cycle_start = seen.iter().position(|t| *t == current).unwrap_or_default();
    seen.drain(cycle_start..).min().unwrap_or(current)
}

#[derive(Default)]
struct Canonicalizer {
    names: FxHashMap<Atom, Atom>,
    counter: u32,
}

impl Canonicalizer {
    fn ty(&mut self, ty: &Type) -> Type {
        let term = self.term(ty.term());
        let constraints: Vec<Term> = ty.constraints().iter().map(|c| self.term(c)).collect();
        Type::new(constraints, term)
    }

    fn term(&mut self, term: &Term) -> Term {
        term.map_vars(&mut |name| {
            if let Some(existing) = self.names.get(name) {
                return Term::Var(existing.clone());
            }
            self.counter += 1;
            let fresh = Atom::new("var").suffixed(self.counter);
            self.names.insert(name.clone(), fresh.clone());
            Term::Var(fresh)
        })
    }
}
