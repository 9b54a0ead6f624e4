//! Interned identifiers.
//!
//! An [`Atom`] is a cheap-to-clone handle to an interned string. Two atoms are
//! equal exactly when their text is equal; interning only makes the common
//! case (same allocation) a pointer comparison.
//!
//! # Examples
//!
//! ```
//! use sleuth_infer::Atom;
//!
//! let a = Atom::new("Int");
//! let b = Atom::from("Int");
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "Int");
//! ```

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use hashbrown::HashSet;

thread_local! {
    static INTERNED: RefCell<HashSet<Rc<str>>> = RefCell::new(HashSet::new());
}

fn intern(text: &str) -> Rc<str> {
    INTERNED.with(|table| {
        let mut table = table.borrow_mut();
        if let Some(existing) = table.get(text) {
            return Rc::clone(existing);
        }
        let fresh: Rc<str> = Rc::from(text);
        table.insert(Rc::clone(&fresh));
        fresh
    })
}

/// An interned identifier with value equality.
#[derive(Clone)]
pub struct Atom(Rc<str>);

impl Atom {
    /// Interns `text` and returns its atom.
    pub fn new(text: &str) -> Self {
        Atom(intern(text))
    }

    /// The atom's text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The scope-local name `{self}_{number}`.
    pub fn suffixed(&self, number: u32) -> Atom {
        Atom::new(&format!("{}_{}", self.0, number))
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Atom {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl From<&str> for Atom {
    fn from(text: &str) -> Self {
        Atom::new(text)
    }
}

impl From<String> for Atom {
    fn from(text: String) -> Self {
        Atom::new(&text)
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({:?})", self.as_str())
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_shares_allocation() {
        let a = Atom::new("String");
        let b = Atom::new("String");
        assert!(Rc::ptr_eq(&a.0, &b.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_text_is_distinct() {
        assert_ne!(Atom::new("Int"), Atom::new("String"));
    }

    #[test]
    fn test_ordering_is_textual() {
        assert!(Atom::new("Apple") < Atom::new("Banana"));
        assert!(Atom::new("a") > Atom::new("B"));
    }

    #[test]
    fn test_suffixed() {
        assert_eq!(Atom::new("any").suffixed(3), Atom::new("any_3"));
    }

    #[test]
    fn test_hash_follows_text() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Atom::new("k"), 1);
        map.insert(Atom::from(String::from("k")), 2);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&Atom::new("k")], 2);
    }

    #[test]
    fn test_display_and_debug() {
        let a = Atom::new("Int");
        assert_eq!(format!("{}", a), "Int");
        assert_eq!(format!("{:?}", a), "Atom(\"Int\")");
    }
}
