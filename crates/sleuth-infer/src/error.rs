//! Error types for the inference engine.
//!
//! Three kinds of failure exist, and they travel very differently:
//!
//! - [`EngineError`]: the host misused the API (for example, depended on a
//!   clue this engine never created). Returned immediately, nothing changes.
//! - [`VarsError`]: a unification step failed. Internal to a rule invocation;
//!   the human-readable story lives in the [`Vars`](crate::unify::Vars) trace.
//! - [`InferenceError`]: a permanent diagnostic recorded on a clue.

use std::fmt;

use crate::engine::ClueId;

/// Misuse of the host-facing API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The id was not issued by this engine.
    UnknownClue(ClueId),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownClue(id) => {
                write!(f, "can't depend on a clue that doesn't exist: {id}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Result type for host-facing engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failure of a unification engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarsError {
    /// The operation failed; the trace says why.
    Mismatch,
    /// The instance had already failed before this call.
    Poisoned,
}

impl fmt::Display for VarsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarsError::Mismatch => write!(f, "unification failed"),
            VarsError::Poisoned => write!(f, "this Vars failed and is in an invalid state"),
        }
    }
}

impl std::error::Error for VarsError {}

/// A permanent error recorded on a clue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceError<S> {
    /// Message followed by the derivation trace, most specific step first.
    pub message: String,
    /// Host sources blamed for the failure.
    pub culpable: Vec<S>,
}

impl<S> InferenceError<S> {
    /// An error blaming `culpable`.
    pub fn new(message: impl Into<String>, culpable: Vec<S>) -> Self {
        Self {
            message: message.into(),
            culpable,
        }
    }

    /// The "depended-on clue had an error" cascade, which blames nobody.
    pub fn cascade(dependency: &ClueId) -> Self {
        Self::new(format!("depended-on clue had an error: {dependency}"), Vec::new())
    }
}

impl<S> fmt::Display for InferenceError<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
