//! The sandbox a rule runs in.
//!
//! A fresh [`RuleContext`] is built for every (clue, rule) pairing. It sees
//! the clue under evaluation at index 0 and its dependencies at 1..n, in
//! declaration order. Every clue gets its own [`Scope`], and so do the rule's
//! literal types, so placeholder names never collide across them.

use std::rc::Rc;

use crate::engine::{Clue, ClueId};
use crate::error::{InferenceError, VarsError};
use crate::fundeps::FunctionalDependencies;
use crate::scope::{Scope, SymbolGenerator};
use crate::term::{Atom, Free, Type};
use crate::unify::Vars;

/// What a rule can see and do.
///
/// Failures raised before [`Tools::preconditions_are_satisfied`] mean "this
/// rule does not apply"; failures raised after it are permanent errors on the
/// clue under evaluation.
pub trait Tools<C> {
    /// Number of relevant clues: the clue itself plus its dependencies.
    fn arity(&self) -> usize;

    /// Kind of clue `i`, or `None` when `i` is out of range.
    fn kind(&self, i: usize) -> Option<&Atom>;

    /// Payload of clue `i`, or `None` when `i` is out of range.
    fn constant(&self, i: usize) -> Option<&C>;

    /// Records a failure blaming the sources of clues `blame`.
    ///
    /// The first failure wins; later calls are ignored.
    fn fail(&mut self, message: &str, blame: &[usize]);

    /// Declares that the rule's pattern matched.
    fn preconditions_are_satisfied(&mut self);

    /// Unifies a type written by the rule with clue `i`'s current type.
    fn unify_free(&mut self, ty: &Free<Type>, i: usize);

    /// Unifies the current types of clues `i` and `j`.
    fn unify_clues(&mut self, i: usize, j: usize);

    /// Clue `i`'s type under the unifications made so far, if nothing failed.
    fn instantiate(&mut self, i: usize) -> Option<Free<Type>>;
}

/// How one rule invocation ended.
#[derive(Debug)]
pub(crate) enum Verdict<S> {
    /// Failed before the preconditions were satisfied.
    NotApplicable(InferenceError<S>),
    /// Failed after the preconditions were satisfied.
    Failed(InferenceError<S>),
    /// Succeeded; one candidate type per relevant clue.
    Refined(Vec<Free<Type>>),
}

/// Concrete [`Tools`] backed by the engine's clue table.
pub(crate) struct RuleContext<'a, S, C> {
    clues: &'a [Clue<S, C>],
    targets: &'a [ClueId],
    vars: Vars,
    rule_scope: Scope,
    clue_scopes: Vec<Scope>,
    preconditions_satisfied: bool,
    error: Option<InferenceError<S>>,
}

impl<'a, S: Clone, C> RuleContext<'a, S, C> {
    pub(crate) fn new(
        clues: &'a [Clue<S, C>],
        targets: &'a [ClueId],
        fundeps: Rc<FunctionalDependencies>,
    ) -> Self {
        let generator = SymbolGenerator::new();
        Self {
            clues,
            targets,
            vars: Vars::new(fundeps),
            rule_scope: generator.create_scope(),
            clue_scopes: targets.iter().map(|_| generator.create_scope()).collect(),
            preconditions_satisfied: false,
            error: None,
        }
    }

    fn clue(&self, i: usize) -> Option<&'a Clue<S, C>> {
        let clues = self.clues;
        self.targets.get(i).and_then(|id| clues.get(id.index()))
    }

    /// `"{message}\n\n{trace}"`, trimmed.
    fn report(&self, message: &str) -> String {
        let trace = self.vars.trace().join("\n");
        format!("{message}\n\n{trace}").trim().to_string()
    }

    fn out_of_range(&mut self, i: usize) {
        self.fail(&format!("no clue at index {i}"), &[]);
    }

    /// Consumes the context and reports the outcome.
    pub(crate) fn finish(mut self) -> Verdict<S> {
        if let Some(error) = self.error.take() {
            return if self.preconditions_satisfied {
                Verdict::Failed(error)
            } else {
                Verdict::NotApplicable(error)
            };
        }

        let mut refined = Vec::with_capacity(self.targets.len());
        for i in 0..self.targets.len() {
            match self.instantiate_clue(i) {
                Ok(ty) => refined.push(ty),
                Err(_) => {
                    let culpable = self.clue(i).map(|c| c.source.clone()).into_iter().collect();
                    return Verdict::Failed(InferenceError::new(
                        self.report(&format!("could not instantiate {i}")),
                        culpable,
                    ));
                }
            }
        }
        Verdict::Refined(refined)
    }

    fn instantiate_clue(&mut self, i: usize) -> Result<Free<Type>, VarsError> {
        let Some(clue) = self.clue(i) else {
            return Err(VarsError::Mismatch);
        };
        let scoped = self.clue_scopes[i].unfree(&clue.ty);
        self.vars.instantiate(&scoped).map(Free::new)
    }
}

impl<S: Clone, C> Tools<C> for RuleContext<'_, S, C> {
    fn arity(&self) -> usize {
        self.targets.len()
    }

    fn kind(&self, i: usize) -> Option<&Atom> {
        self.clue(i).map(|clue| &clue.kind)
    }

    fn constant(&self, i: usize) -> Option<&C> {
        self.clue(i).map(|clue| &clue.constant)
    }

    fn fail(&mut self, message: &str, blame: &[usize]) {
        if self.error.is_some() {
            return;
        }
        let culpable = blame
            .iter()
            .filter_map(|&i| self.clue(i))
            .map(|clue| clue.source.clone())
            .collect();
        self.error = Some(InferenceError::new(self.report(message), culpable));
    }

    fn preconditions_are_satisfied(&mut self) {
        self.preconditions_satisfied = true;
    }

    fn unify_free(&mut self, ty: &Free<Type>, i: usize) {
        if self.error.is_some() {
            return;
        }
        let Some(clue) = self.clue(i) else {
            return self.out_of_range(i);
        };

        let rule_ty = self.rule_scope.unfree(ty);
        let clue_ty = self.clue_scopes[i].unfree(&clue.ty);
        if self.vars.unify(&rule_ty, &clue_ty).is_err() {
            let message = format!(
                "could not match {i} with inference rule type {}",
                ty.unresolved()
            );
            self.fail(&message, &[i]);
        }
    }

    fn unify_clues(&mut self, i: usize, j: usize) {
        if self.error.is_some() {
            return;
        }
        let (Some(left), Some(right)) = (self.clue(i), self.clue(j)) else {
            let missing = if self.clue(i).is_none() { i } else { j };
            return self.out_of_range(missing);
        };

        let left_ty = self.clue_scopes[i].unfree(&left.ty);
        let right_ty = self.clue_scopes[j].unfree(&right.ty);
        if self.vars.unify(&left_ty, &right_ty).is_err() {
            self.fail(&format!("could not match {i} with {j}"), &[i, j]);
        }
    }

    fn instantiate(&mut self, i: usize) -> Option<Free<Type>> {
        if self.error.is_some() {
            return None;
        }
        self.instantiate_clue(i).ok()
    }
}
