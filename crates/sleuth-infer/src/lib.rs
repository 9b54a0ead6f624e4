//! `sleuth`: incremental, constraint-based type inference.
//!
//! This crate is infrastructure for building type inferencers. A host builds
//! a growing graph of *clues* (facts whose type must be inferred), registers
//! pluggable *rules*, and asks the engine to refine every clue's type to a
//! fixpoint:
//!
//! - **Term algebra** ([`term`]): atoms, terms, qualified types, free values
//! - **Scopes** ([`scope`]): hygienic fresh-variable allocation
//! - **Functional dependencies** ([`fundeps`]): when constraints must agree
//! - **Unification** ([`unify`]): bindings, occurs check, constraint store
//! - **Rule tools** ([`rules`]): the sandbox a rule runs in
//! - **Engine** ([`engine`]): clue graph, worklist, fixpoint driver
//!
//! # Example
//!
//! ```
//! use sleuth_infer::{Atom, Free, Inferrer, Tools, Type};
//!
//! let mut inferrer: Inferrer<(), i64> = Inferrer::default();
//! inferrer.create_rule(|tools: &mut dyn Tools<i64>| {
//!     if tools.kind(0) != Some(&Atom::new("Literal")) {
//!         return;
//!     }
//!     tools.preconditions_are_satisfied();
//!     tools.unify_free(&Free::new(Type::atom("Int")), 0);
//! });
//!
//! let lit = inferrer.create_clue("Literal", (), 7, &[]).unwrap();
//! inferrer.process();
//!
//! let int = Free::new(Type::atom("Int"));
//! assert!(inferrer.ty(&lit).unwrap().equivalent(&int));
//! assert_eq!(inferrer.errors(&lit).unwrap().count(), 0);
//! ```

pub mod engine;
pub mod error;
pub mod fundeps;
pub mod rules;
pub mod scope;
pub mod term;
pub mod unify;

pub use engine::{ClueId, Inferrer};
pub use error::{EngineError, InferenceError, Result, VarsError};
pub use fundeps::FunctionalDependencies;
pub use rules::{Named, Rule, Tools, named};
pub use scope::{Allocation, Scope, SymbolGenerator};
pub use term::{Atom, Free, Term, Type};
pub use unify::Vars;
