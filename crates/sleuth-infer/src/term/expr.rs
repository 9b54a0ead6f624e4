//! Symbolic terms.
//!
//! A [`Term`] is an immutable tree with three shapes:
//!
//! - `Atom(a)`: a constant such as `Int`
//! - `Apply(f, x)`: curried application, so `Map K V` is `Apply(Apply(Map, K), V)`
//! - `Var(v)`: a unification variable
//!
//! Equality, ordering and hashing are structural. The derived ordering puts
//! atoms before applications before variables, which is what gives
//! [`Type`](super::Type) its canonical constraint order.

use std::rc::Rc;

use super::Atom;

/// An immutable symbolic expression.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// A constant label.
    Atom(Atom),

    /// Application of a function term to an argument term.
    Apply(Rc<Term>, Rc<Term>),

    /// A unification variable.
    Var(Atom),
}

impl Term {
    /// `Atom(name)`.
    pub fn atom(name: impl Into<Atom>) -> Term {
        Term::Atom(name.into())
    }

    /// `Var(name)`.
    pub fn var(name: impl Into<Atom>) -> Term {
        Term::Var(name.into())
    }

    /// `Apply(f, x)`.
    pub fn apply(f: Term, x: Term) -> Term {
        Term::Apply(Rc::new(f), Rc::new(x))
    }

    /// Left-nested application of `head` to every argument in order.
    ///
    /// `Term::app(Map, [K, V])` is `Map (K) (V)`.
    pub fn app(head: Term, args: impl IntoIterator<Item = Term>) -> Term {
        args.into_iter().fold(head, Term::apply)
    }

    /// True for `Var`.
    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    /// True when no variable occurs anywhere in the term.
    pub fn is_ground(&self) -> bool {
        self.variables().next().is_none()
    }

    /// Lazy pre-order walk over the variable names in the term, with
    /// duplicates, left to right.
    pub fn variables(&self) -> Variables<'_> {
        Variables { stack: vec![self] }
    }

    /// Rebuilds the term, replacing every variable with `f(name)`.
    pub fn map_vars(&self, f: &mut impl FnMut(&Atom) -> Term) -> Term {
        match self {
            Term::Atom(_) => self.clone(),
            Term::Apply(func, arg) => Term::apply(func.map_vars(f), arg.map_vars(f)),
            Term::Var(name) => f(name),
        }
    }
}

/// Iterator returned by [`Term::variables`].
pub struct Variables<'a> {
    stack: Vec<&'a Term>,
}

impl<'a> Iterator for Variables<'a> {
    type Item = &'a Atom;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(term) = self.stack.pop() {
            match term {
                Term::Atom(_) => {}
                Term::Apply(f, x) => {
                    // x first so that f is visited first
                    self.stack.push(x);
                    self.stack.push(f);
                }
                Term::Var(name) => return Some(name),
            }
        }
        None
    }
}
