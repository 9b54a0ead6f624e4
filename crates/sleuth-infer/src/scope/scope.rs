//! Scopes: idempotent name allocation and free-value resolution.
//!
//! Within one [`Scope`], every request for the same base name returns the same
//! allocation. Resolving (`unfree`) a free value rewrites each variable `v` to
//! `v_N`, where `N` is the scope's allocation for `v`:
//!
//! - two occurrences of `v` resolved through one scope become one variable
//! - one free value resolved through two scopes becomes two unrelated values
//!
//! ```
//! use sleuth_infer::{Free, SymbolGenerator, Term, Type};
//!
//! let generator = SymbolGenerator::new();
//! let mut left = generator.create_scope();
//! let mut right = generator.create_scope();
//!
//! let free = Free::new(Type::var("a"));
//! assert_eq!(left.unfree(&free), Type::var("a_1"));
//! assert_eq!(left.unfree(&free), Type::var("a_1"));
//! assert_eq!(right.unfree(&free), Type::var("a_2"));
//! ```

use fxhash::FxHashMap;

use crate::engine::ClueId;
use crate::scope::{Allocation, SymbolGenerator};
use crate::term::{Atom, Free, Term, Type};

/// A hygienic renaming context.
#[derive(Debug)]
pub struct Scope {
    generator: SymbolGenerator,
    assigned: FxHashMap<Atom, Allocation>,
}

impl Scope {
    pub(crate) fn new(generator: SymbolGenerator) -> Self {
        Self {
            generator,
            assigned: FxHashMap::default(),
        }
    }

    /// The allocation for `name`, made on first request and cached after.
    pub fn generate(&mut self, name: &Atom) -> Allocation {
        if let Some(existing) = self.assigned.get(name) {
            return existing.clone();
        }
        let fresh = self.generator.generate(name);
        self.assigned.insert(name.clone(), fresh.clone());
        fresh
    }

    /// The clue id for `name` within this scope.
    pub fn generate_clue_id(&mut self, name: &Atom) -> ClueId {
        ClueId::from(self.generate(name))
    }

    /// Resolves a free type into this scope.
    pub fn unfree(&mut self, free: &Free<Type>) -> Type {
        free.unresolved().map_terms(|term| self.resolve(term))
    }

    /// Resolves a free term into this scope.
    pub fn unfree_term(&mut self, free: &Free<Term>) -> Term {
        self.resolve(free.unresolved())
    }

    fn resolve(&mut self, term: &Term) -> Term {
        term.map_vars(&mut |name| {
            let allocation = self.generate(name);
            Term::Var(allocation.prefix.suffixed(allocation.number))
        })
    }
}
