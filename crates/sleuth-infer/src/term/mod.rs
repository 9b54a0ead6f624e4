//! Term algebra.
//!
//! This module defines the symbolic values every other layer works on:
//!
//! - **Atom**: interned identifier (variable names, labels, clue kinds)
//! - **Term**: `Atom`, `Apply` (curried application) or `Var`
//! - **Type**: a term qualified by a canonically ordered set of constraints
//! - **Free**: marker for values whose variables are not yet scoped
//! - **Display**: human-readable rendering used in traces and logs

pub mod atom;
pub mod display;
pub mod expr;
pub mod free;
pub mod ty;

pub use atom::Atom;
pub use expr::{Term, Variables};
pub use free::Free;
pub use ty::Type;
