//! Clue identities and records.
//!
//! Clues live in an arena indexed by their absolute number: the record for a
//! clue with `absolute_number() == n` sits at index `n - 1`. Dependencies and
//! dependents are stored as ids, never as references, so the graph carries no
//! ownership cycles.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::InferenceError;
use crate::scope::Allocation;
use crate::term::{Atom, Free, Type};

/// Identity of a clue: `(word, number, absolute)`.
///
/// `absolute` is the creation order and doubles as a topological order, since
/// a clue can only depend on clues created before it. Ids order by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClueId {
    word: Atom,
    number: u32,
    absolute: u32,
}

impl ClueId {
    /// The kind the id was generated for.
    pub fn word(&self) -> &Atom {
        &self.word
    }

    /// Sequence number among ids with the same word.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Creation order across all clues of the engine, from 1.
    pub fn absolute_number(&self) -> u32 {
        self.absolute
    }

    /// Arena slot of the clue.
    pub(crate) fn index(&self) -> usize {
        (self.absolute as usize).saturating_sub(1)
    }
}

impl From<Allocation> for ClueId {
    fn from(allocation: Allocation) -> Self {
        Self {
            word: allocation.prefix,
            number: allocation.number,
            absolute: allocation.absolute,
        }
    }
}

impl PartialOrd for ClueId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClueId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.absolute
            .cmp(&other.absolute)
            .then_with(|| self.word.cmp(&other.word))
            .then_with(|| self.number.cmp(&other.number))
    }
}

impl fmt::Display for ClueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.word, self.number)
    }
}

/// Engine-side record of one clue.
#[derive(Debug)]
pub(crate) struct Clue<S, C> {
    pub(crate) id: ClueId,
    pub(crate) kind: Atom,
    pub(crate) source: S,
    pub(crate) constant: C,
    pub(crate) depends_on: Vec<ClueId>,
    pub(crate) dependents: BTreeSet<ClueId>,
    pub(crate) ty: Free<Type>,
    pub(crate) errors: Vec<InferenceError<S>>,
}

impl<S, C> Clue<S, C> {
    pub(crate) fn new(id: ClueId, source: S, constant: C, depends_on: Vec<ClueId>) -> Self {
        Self {
            kind: id.word().clone(),
            id,
            source,
            constant,
            depends_on,
            dependents: BTreeSet::new(),
            ty: Free::most_general(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }
}
