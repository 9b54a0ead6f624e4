//! Counters behind fresh names.
//!
//! Every allocation yields `(prefix, number, absolute)`. `number` counts per
//! prefix, so unrelated prefixes all get small readable numbers (`any_1`,
//! `elem_1`), while `absolute` counts across the whole generator and is
//! unique.
//!
//! # Examples
//!
//! ```
//! use sleuth_infer::{Atom, SymbolGenerator};
//!
//! let generator = SymbolGenerator::new();
//! let a = generator.generate(&Atom::new("a"));
//! let b = generator.generate(&Atom::new("b"));
//! let a2 = generator.generate(&Atom::new("a"));
//!
//! assert_eq!((a.number, a.absolute), (1, 1));
//! assert_eq!((b.number, b.absolute), (1, 2));
//! assert_eq!((a2.number, a2.absolute), (2, 3));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use fxhash::FxHashMap;

use crate::engine::ClueId;
use crate::scope::Scope;
use crate::term::Atom;

/// One fresh-name allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Allocation {
    /// The base name the allocation was made for.
    pub prefix: Atom,
    /// Sequence number among allocations with the same prefix, from 1.
    pub number: u32,
    /// Sequence number among all allocations of the generator, from 1.
    pub absolute: u32,
}

#[derive(Debug, Default)]
struct Counters {
    per_prefix: FxHashMap<Atom, u32>,
    absolute: u32,
}

/// Shared source of fresh names.
///
/// Cloning the generator shares its counters, which is how every [`Scope`]
/// created from it draws from the same sequence.
#[derive(Debug, Clone, Default)]
pub struct SymbolGenerator {
    counters: Rc<RefCell<Counters>>,
}

impl SymbolGenerator {
    /// A generator with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope drawing from this generator.
    pub fn create_scope(&self) -> Scope {
        Scope::new(self.clone())
    }

    /// Allocates the next name for `prefix`.
    pub fn generate(&self, prefix: &Atom) -> Allocation {
        let mut counters = self.counters.borrow_mut();
        counters.absolute += 1;
        let absolute = counters.absolute;
        let number = counters.per_prefix.entry(prefix.clone()).or_insert(0);
        *number += 1;
        Allocation {
            prefix: prefix.clone(),
            number: *number,
            absolute,
        }
    }

    /// Allocates a clue id whose word is `prefix`.
    pub fn generate_clue_id(&self, prefix: &Atom) -> ClueId {
        ClueId::from(self.generate(prefix))
    }

    /// Total allocations made so far.
    pub fn allocated(&self) -> u32 {
        self.counters.borrow().absolute
    }
}
