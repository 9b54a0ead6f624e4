//! Pretty-printing for traces and diagnostics.
//!
//! - atoms print as their text: `Int`
//! - variables print with a sigil: `@a`
//! - applications print curried: `Map (@k) (@v)`
//! - types print as `c1, c2 => t`, or `true => t` when unconstrained
//! - free values print as `free(...)`

use std::fmt;

use super::{Free, Term, Type};

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) => write!(f, "{}", name),
            Term::Apply(func, arg) => write!(f, "{} ({})", func, arg),
            Term::Var(name) => write!(f, "@{}", name),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraints().is_empty() {
            return write!(f, "true => {}", self.term());
        }
        for (i, constraint) in self.constraints().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", constraint)?;
        }
        write!(f, " => {}", self.term())
    }
}

impl<T: fmt::Display> fmt::Display for Free<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "free({})", self.unresolved())
    }
}
