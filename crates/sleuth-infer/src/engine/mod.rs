//! Inference engine.
//!
//! - **ClueId / Clue**: identities and arena records of the clue graph
//! - **Inferrer**: clue creation, rule registration, fixpoint processing

pub mod clue;
pub mod inferrer;

pub(crate) use clue::Clue;
pub use clue::ClueId;
pub use inferrer::Inferrer;
