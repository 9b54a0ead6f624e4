//! Hygienic fresh-name allocation.
//!
//! - **SymbolGenerator**: global and per-prefix counters
//! - **Scope**: memoizes one allocation per base name and resolves free
//!   values into scope-local variables

pub mod generator;
#[allow(clippy::module_inception)]
pub mod scope;

pub use generator::{Allocation, SymbolGenerator};
pub use scope::Scope;
