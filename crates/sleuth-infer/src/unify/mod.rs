//! Unification engine.
//!
//! - **Vars**: bindings, occurs check, constraint store and failure trace

pub mod vars;

pub use vars::Vars;
