//! Functional dependencies between constraints.
//!
//! Some constraints may coexist: `CanConvert Int Double` and
//! `CanConvert Int Float` say different, compatible things. Others describe
//! the same slot and must agree: `RepresentedAs Int Bit64` and
//! `RepresentedAs Int Bit32` cannot both hold.
//!
//! The policy captures this with a *key* per constraint. When a constraint is
//! added to a [`Vars`](crate::unify::Vars), every existing constraint whose key
//! unifies with the new key is forced to unify with the new constraint.
//! When no finder answers, a constraint's key is the constraint itself and it
//! stays independent: only an identical constraint is folded into it.
//!
//! # Examples
//!
//! ```
//! use sleuth_infer::{Atom, FunctionalDependencies, Term};
//!
//! // `RepresentedAs t r`: the representation is determined by `t`.
//! let represented_as = Atom::new("RepresentedAs");
//! let fundeps = FunctionalDependencies::new().with_key(move |constraint: &Term| {
//!     match constraint {
//!         Term::Apply(head, _repr) => match head.as_ref() {
//!             Term::Apply(name, _) if **name == Term::Atom(represented_as.clone()) => {
//!                 Some(head.as_ref().clone())
//!             }
//!             _ => None,
//!         },
//!         _ => None,
//!     }
//! });
//!
//! let c = Term::app(Term::atom("RepresentedAs"), [Term::atom("Int"), Term::atom("Bit64")]);
//! assert_eq!(fundeps.key(&c), Term::apply(Term::atom("RepresentedAs"), Term::atom("Int")));
//!
//! let other = Term::apply(Term::atom("Show"), Term::atom("Int"));
//! assert_eq!(fundeps.key(&other), other);
//! ```

use std::fmt;

use crate::term::Term;

type KeyFinder = Box<dyn Fn(&Term) -> Option<Term>>;

/// Ordered list of key finders; the first finder that answers wins.
#[derive(Default)]
pub struct FunctionalDependencies {
    key_finders: Vec<KeyFinder>,
}

impl FunctionalDependencies {
    /// The empty policy: constraints are only merged with equal-shaped ones.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a key finder, consulted after the ones already registered.
    pub fn with_key(mut self, finder: impl Fn(&Term) -> Option<Term> + 'static) -> Self {
        self.push(finder);
        self
    }

    /// Appends a key finder in place.
    pub fn push(&mut self, finder: impl Fn(&Term) -> Option<Term> + 'static) {
        self.key_finders.push(Box::new(finder));
    }

    /// The functional-dependency key of `constraint`.
    pub fn key(&self, constraint: &Term) -> Term {
        self.finder_key(constraint)
            .unwrap_or_else(|| constraint.clone())
    }

    /// The key a registered finder produced for `constraint`, if any.
    ///
    /// Constraints without one are independent: they are never merged with
    /// anything except an identical constraint.
    pub fn finder_key(&self, constraint: &Term) -> Option<Term> {
        self.key_finders.iter().find_map(|finder| finder(constraint))
    }

    /// Number of registered key finders.
    pub fn len(&self) -> usize {
        self.key_finders.len()
    }

    /// True when no key finder is registered.
    pub fn is_empty(&self) -> bool {
        self.key_finders.is_empty()
    }
}

impl fmt::Debug for FunctionalDependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionalDependencies")
            .field("key_finders", &self.key_finders.len())
            .finish()
    }
}
