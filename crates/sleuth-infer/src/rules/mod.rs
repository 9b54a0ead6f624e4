//! Inference rules and the tools they work with.
//!
//! A rule is any value implementing [`Rule`]; plain functions and closures
//! taking `&mut dyn Tools<C>` qualify through a blanket impl. A rule returns
//! nothing: it reports through [`Tools::fail`],
//! [`Tools::preconditions_are_satisfied`] and the unify calls.

pub mod tools;

pub use tools::Tools;
pub(crate) use tools::{RuleContext, Verdict};

/// A pluggable inference rule, applied to every clue the engine dequeues.
pub trait Rule<C> {
    /// Runs the rule against one clue and its dependencies.
    fn apply(&self, tools: &mut dyn Tools<C>);

    /// Label used in log lines.
    fn name(&self) -> &str {
        "rule"
    }
}

impl<C, F> Rule<C> for F
where
    F: Fn(&mut dyn Tools<C>),
{
    fn apply(&self, tools: &mut dyn Tools<C>) {
        self(tools)
    }
}

/// A rule with a label for the logs.
pub struct Named<F> {
    name: String,
    rule: F,
}

/// Attaches `name` to `rule`.
pub fn named<F>(name: impl Into<String>, rule: F) -> Named<F> {
    Named {
        name: name.into(),
        rule,
    }
}

impl<C, F> Rule<C> for Named<F>
where
    F: Fn(&mut dyn Tools<C>),
{
    fn apply(&self, tools: &mut dyn Tools<C>) {
        (self.rule)(tools)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
