//! The fixpoint driver.
//!
//! The inferrer owns the clue graph and a worklist ordered by absolute
//! number. [`Inferrer::process`] pops the oldest pending clue, runs every
//! rule against it, and re-enqueues the dependents of each clue whose type
//! actually changed, until nothing is pending.

use std::collections::BTreeSet;
use std::rc::Rc;

use sleuth_log::{debug, trace};

use crate::engine::clue::{Clue, ClueId};
use crate::error::{EngineError, InferenceError, Result};
use crate::fundeps::FunctionalDependencies;
use crate::rules::{Rule, RuleContext, Verdict};
use crate::scope::SymbolGenerator;
use crate::term::{Atom, Free, Type};

/// Incremental type inferrer over clues with host sources `S` and payloads
/// `C`.
pub struct Inferrer<S, C> {
    ids: SymbolGenerator,
    fundeps: Rc<FunctionalDependencies>,
    clues: Vec<Clue<S, C>>,
    worklist: BTreeSet<ClueId>,
    rules: Vec<Box<dyn Rule<C>>>,
}

impl<S, C> Default for Inferrer<S, C> {
    fn default() -> Self {
        Self::new(FunctionalDependencies::new())
    }
}

impl<S, C> Inferrer<S, C> {
    /// An empty inferrer governed by `fundeps`.
    pub fn new(fundeps: FunctionalDependencies) -> Self {
        Self {
            ids: SymbolGenerator::new(),
            fundeps: Rc::new(fundeps),
            clues: Vec::new(),
            worklist: BTreeSet::new(),
            rules: Vec::new(),
        }
    }

    /// Registers `rule` after the ones already registered.
    pub fn create_rule(&mut self, rule: impl Rule<C> + 'static) {
        debug!("registered rule {} (#{})", rule.name(), self.rules.len() + 1);
        self.rules.push(Box::new(rule));
    }

    /// Adds a clue and enqueues it.
    ///
    /// Every dependency must have been created by this inferrer; otherwise
    /// nothing is created.
    pub fn create_clue(
        &mut self,
        kind: impl Into<Atom>,
        source: S,
        constant: C,
        depends_on: &[ClueId],
    ) -> Result<ClueId> {
        for dependency in depends_on {
            self.clue(dependency)?;
        }

        let id = self.ids.generate_clue_id(&kind.into());
        for dependency in depends_on {
            self.clues[dependency.index()].dependents.insert(id.clone());
        }
        self.clues
            .push(Clue::new(id.clone(), source, constant, depends_on.to_vec()));
        self.worklist.insert(id.clone());

        debug!("created clue {id} depending on {} clue(s)", depends_on.len());
        Ok(id)
    }

    fn clue(&self, id: &ClueId) -> Result<&Clue<S, C>> {
        self.clues
            .get(id.index())
            .filter(|clue| clue.id == *id)
            .ok_or_else(|| EngineError::UnknownClue(id.clone()))
    }

    /// Best-known type of `id`.
    pub fn ty(&self, id: &ClueId) -> Result<&Free<Type>> {
        self.clue(id).map(|clue| &clue.ty)
    }

    /// Error messages recorded on `id`; empty when it has none.
    pub fn errors(&self, id: &ClueId) -> Result<impl Iterator<Item = &str> + '_> {
        self.clue(id)
            .map(|clue| clue.errors.iter().map(|error| error.message.as_str()))
    }

    /// Errors recorded on `id`, with their culpable sources.
    pub fn diagnostics(&self, id: &ClueId) -> Result<&[InferenceError<S>]> {
        self.clue(id).map(|clue| clue.errors.as_slice())
    }

    /// Kind `id` was created with.
    pub fn kind(&self, id: &ClueId) -> Result<&Atom> {
        self.clue(id).map(|clue| &clue.kind)
    }

    /// Host source attached to `id`.
    pub fn source(&self, id: &ClueId) -> Result<&S> {
        self.clue(id).map(|clue| &clue.source)
    }

    /// Payload attached to `id`.
    pub fn constant(&self, id: &ClueId) -> Result<&C> {
        self.clue(id).map(|clue| &clue.constant)
    }

    /// Direct dependencies of `id`, in declaration order.
    pub fn dependencies(&self, id: &ClueId) -> Result<&[ClueId]> {
        self.clue(id).map(|clue| clue.depends_on.as_slice())
    }

    /// Clues that directly depend on `id`, oldest first.
    pub fn dependents(&self, id: &ClueId) -> Result<impl Iterator<Item = &ClueId> + '_> {
        self.clue(id).map(|clue| clue.dependents.iter())
    }

    /// Number of clues created so far.
    pub fn clue_count(&self) -> usize {
        self.clues.len()
    }

    /// Number of clues waiting to be processed.
    pub fn pending(&self) -> usize {
        self.worklist.len()
    }
}

impl<S: Clone, C> Inferrer<S, C> {
    /// Runs rules until no clue is pending.
    pub fn process(&mut self) {
        let mut steps = 0usize;
        while let Some(next) = self.worklist.pop_first() {
            steps += 1;
            self.run_rules_on(&next);
        }
        debug!("process reached a fixpoint after {steps} step(s)");
    }

    fn run_rules_on(&mut self, next: &ClueId) {
        trace!("dequeued {next}");
        let index = next.index();
        if self.clues[index].has_error() {
            return;
        }

        let targets: Vec<ClueId> = std::iter::once(next.clone())
            .chain(self.clues[index].depends_on.iter().cloned())
            .collect();

        let cascade: Vec<InferenceError<S>> = targets[1..]
            .iter()
            .filter(|dependency| self.clues[dependency.index()].has_error())
            .map(InferenceError::cascade)
            .collect();
        if !cascade.is_empty() {
            debug!("{next} depends on {} errored clue(s)", cascade.len());
            self.clues[index].errors.extend(cascade);
            return;
        }

        for r in 0..self.rules.len() {
            let verdict = {
                let rule = &self.rules[r];
                let mut context =
                    RuleContext::new(&self.clues, &targets, Rc::clone(&self.fundeps));
                rule.apply(&mut context);
                context.finish()
            };

            match verdict {
                Verdict::NotApplicable(error) => {
                    trace!(
                        "{} does not apply to {next}: {}",
                        self.rules[r].name(),
                        error.message.lines().next().unwrap_or_default()
                    );
                }
                Verdict::Failed(error) => {
                    debug!("{} failed on {next}: {error}", self.rules[r].name());
                    self.clues[index].errors.push(error);
                    return;
                }
                Verdict::Refined(types) => {
                    for (id, ty) in targets.iter().zip(types) {
                        self.refine(id, ty);
                    }
                }
            }
        }
    }

    /// Stores `ty` on `id` if it says something new, waking the dependents.
    fn refine(&mut self, id: &ClueId, ty: Free<Type>) {
        let clue = &mut self.clues[id.index()];
        if clue.ty.equivalent(&ty) {
            return;
        }

        let ty = ty.canonicalize();
        debug!("{id}: {} => {}", clue.ty.unresolved(), ty.unresolved());
        clue.ty = ty;
        self.worklist.extend(clue.dependents.iter().cloned());
    }
}
