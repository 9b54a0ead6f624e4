//! Unification with occurs check and a functional-dependency constraint store.
//!
//! A [`Vars`] owns three things:
//!
//! - **bindings**: variable name → bound term
//! - **constraints**: the live constraint set
//! - **trace**: human-readable failure story, most specific step first
//!
//! The trace doubles as the failure flag. Once anything has been written to
//! it the instance is poisoned: every further operation returns
//! [`VarsError::Poisoned`] and only [`Vars::trace`] is meaningful.
//!
//! # Constraint merging
//!
//! Adding a constraint compares its functional-dependency key with the key of
//! every live constraint that also has a finder-produced key. The key
//! unification is first tried on a throwaway clone (the *decoy*); only if the
//! decoy succeeds is it repeated on the real state, after which the two full
//! constraints must unify. The matched constraint is then subsumed by the new
//! one, so at most one constraint per key class survives.
//!
//! Constraints no key finder answers for are independent: `Show @a` and
//! `Show @b` both stay, and neither variable is bound. Such a constraint only
//! replaces a live one that is identical under the current bindings.

use std::rc::Rc;

use fxhash::{FxHashMap, FxHashSet};

use crate::error::VarsError;
use crate::fundeps::FunctionalDependencies;
use crate::term::{Atom, Term, Type};

type Outcome = std::result::Result<(), VarsError>;

/// Binding store, constraint store and failure trace.
#[derive(Debug, Clone)]
pub struct Vars {
    trace: Vec<String>,
    fundeps: Rc<FunctionalDependencies>,
    constraints: Vec<Term>,
    bindings: FxHashMap<Atom, Term>,
}

impl Vars {
    /// An empty store governed by `fundeps`.
    pub fn new(fundeps: Rc<FunctionalDependencies>) -> Self {
        Self {
            trace: Vec::new(),
            fundeps,
            constraints: Vec::new(),
            bindings: FxHashMap::default(),
        }
    }

    /// True once any operation has failed.
    pub fn failed(&self) -> bool {
        !self.trace.is_empty()
    }

    /// The failure story, most specific step first. Empty unless failed.
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// Live constraints, in insertion order, before substitution.
    pub fn constraints(&self) -> &[Term] {
        &self.constraints
    }

    /// The term `var` is directly bound to, if any.
    pub fn binding(&self, var: &Atom) -> Option<&Term> {
        self.bindings.get(var)
    }

    /// Number of bound variables.
    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }

    fn guard(&self) -> Outcome {
        if self.failed() {
            return Err(VarsError::Poisoned);
        }
        Ok(())
    }

    fn fail(&mut self, message: String) -> Outcome {
        self.trace.push(message);
        Err(VarsError::Mismatch)
    }

    /// Adds a line of context to a failed outcome.
    fn within(&mut self, outcome: Outcome, context: impl FnOnce() -> String) -> Outcome {
        if outcome == Err(VarsError::Mismatch) {
            self.trace.push(context());
        }
        outcome
    }

    /// Unifies two qualified types: every constraint of `t1`, then of `t2`,
    /// goes through [`Vars::constrain`], then the underlying terms unify.
    pub fn unify(&mut self, t1: &Type, t2: &Type) -> Outcome {
        self.guard()?;

        for side in [t1, t2] {
            for constraint in side.constraints() {
                let outcome = self.constrain(constraint);
                self.within(outcome, || {
                    format!("while adding constraint {constraint} from {side}")
                })?;
            }
        }

        let outcome = self.unify_terms(t1.term(), t2.term());
        self.within(outcome, || format!("while unifying type {t1} with {t2}"))
    }

    /// Adds `constraint`, merging it with every live constraint whose key
    /// unifies with its key.
    pub fn constrain(&mut self, constraint: &Term) -> Outcome {
        self.guard()?;

        let key = self.fundeps.finder_key(constraint);
        let existing = self.constraints.clone();
        let mut kept = Vec::with_capacity(existing.len() + 1);

        for theirs in &existing {
            let (Some(key), Some(their_key)) = (&key, self.fundeps.finder_key(theirs)) else {
                if self.substitute(theirs) != self.substitute(constraint) {
                    kept.push(theirs.clone());
                }
                continue;
            };

            let mut decoy = self.clone();
            if decoy.unify_terms(key, &their_key).is_err() {
                kept.push(theirs.clone());
                continue;
            }

            self.unify_terms(key, &their_key)?;
            let outcome = self.unify_terms(constraint, theirs);
            self.within(outcome, || {
                format!(
                    "while unifying new constraint {constraint} with existing matching-fundep constraint {theirs}"
                )
            })?;
        }

        kept.push(constraint.clone());
        self.constraints = kept;
        Ok(())
    }

    /// Structural unification of two terms.
    pub fn unify_terms(&mut self, t1: &Term, t2: &Term) -> Outcome {
        self.guard()?;

        match (t1, t2) {
            (Term::Var(var), _) => self.unify_var(var, t2),
            // only the left side is ever bound
            (_, Term::Var(var)) => self.unify_var(var, t1),
            (Term::Atom(a), Term::Atom(b)) => {
                if a == b {
                    Ok(())
                } else {
                    self.fail(format!("mismatching atoms: {a} and {b}"))
                }
            }
            (Term::Atom(a), Term::Apply(..)) => {
                self.fail(format!("could not match atom {a} with application {t2}"))
            }
            (Term::Apply(..), Term::Atom(b)) => {
                self.fail(format!("could not match application {t1} with atom {b}"))
            }
            (Term::Apply(f1, x1), Term::Apply(f2, x2)) => {
                let outcome = self.unify_terms(f1, f2);
                self.within(outcome, || format!("while unifying term {t1} with {t2}"))?;
                let outcome = self.unify_terms(x1, x2);
                self.within(outcome, || format!("while unifying term {t1} with {t2}"))
            }
        }
    }

    fn unify_var(&mut self, var: &Atom, other: &Term) -> Outcome {
        if let Some(bound) = self.bindings.get(var).cloned() {
            let outcome = self.unify_terms(&bound, other);
            return self.within(outcome, || format!("while unifying term @{var} with {other}"));
        }

        let other = self.resolve_head(other);
        if matches!(&other, Term::Var(name) if name == var) {
            return Ok(());
        }

        let outcome = self.occurs_check(var, &other);
        if outcome.is_err() {
            self.trace
                .push(format!("@{var} occurs in {other}, so it can't match with it"));
            self.trace.push(format!("while unifying term @{var} with {other}"));
            return outcome;
        }

        self.bindings.insert(var.clone(), other);
        Ok(())
    }

    /// Follows variable-to-binding links at the top of `term` only.
    fn resolve_head(&self, term: &Term) -> Term {
        let mut current = term;
        while let Term::Var(name) = current {
            match self.bindings.get(name) {
                Some(bound) => current = bound,
                None => break,
            }
        }
        current.clone()
    }

    /// Records a failure if `var` occurs in `term`, following bindings.
    fn occurs_check(&mut self, var: &Atom, term: &Term) -> Outcome {
        match term {
            Term::Atom(_) => Ok(()),
            Term::Apply(f, x) => {
                self.occurs_check(var, f)?;
                self.occurs_check(var, x)
            }
            Term::Var(name) if name == var => self.fail("occurs check failed".to_string()),
            Term::Var(name) => match self.bindings.get(name).cloned() {
                Some(bound) => {
                    let outcome = self.occurs_check(var, &bound);
                    self.within(outcome, || format!("when resolving @{name} to {bound}"))
                }
                None => Ok(()),
            },
        }
    }

    /// True when `var` occurs free in `term` once bindings are followed.
    pub fn occurs_in(&self, var: &Atom, term: &Term) -> bool {
        match term {
            Term::Atom(_) => false,
            Term::Apply(f, x) => self.occurs_in(var, f) || self.occurs_in(var, x),
            Term::Var(name) if name == var => true,
            Term::Var(name) => self
                .bindings
                .get(name)
                .is_some_and(|bound| self.occurs_in(var, bound)),
        }
    }

    /// Fully substitutes `term` through the bindings.
    ///
    /// Terminates because the occurs check rules out binding cycles.
    pub fn instantiate_without_constraints(&self, term: &Term) -> Result<Term, VarsError> {
        self.guard()?;
        Ok(self.substitute(term))
    }

    /// Substitutes `term` and qualifies it with the salient constraints:
    /// those that, after substitution, share a variable with the result.
    pub fn instantiate_with_constraints(&self, term: &Term) -> Result<Type, VarsError> {
        self.guard()?;
        Ok(self.qualify(self.substitute(term), &[]))
    }

    /// Like [`Vars::instantiate_with_constraints`], but `ty`'s own constraints
    /// are candidates too, even if they never went through [`Vars::constrain`].
    pub fn instantiate(&self, ty: &Type) -> Result<Type, VarsError> {
        self.guard()?;
        Ok(self.qualify(self.substitute(ty.term()), ty.constraints()))
    }

    fn qualify(&self, base: Term, extra: &[Term]) -> Type {
        let variables: FxHashSet<&Atom> = base.variables().collect();
        let salient = self
            .constraints
            .iter()
            .chain(extra)
            .map(|constraint| self.substitute(constraint))
            .filter(|constraint| constraint.variables().any(|v| variables.contains(v)))
            .collect::<Vec<_>>();

        Type::new(salient, base)
    }

    fn substitute(&self, term: &Term) -> Term {
        match term {
            Term::Atom(_) => term.clone(),
            Term::Apply(f, x) => Term::apply(self.substitute(f), self.substitute(x)),
            Term::Var(name) => match self.bindings.get(name) {
                Some(bound) => self.substitute(bound),
                None => term.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> Vars {
        Vars::new(Rc::new(FunctionalDependencies::new()))
    }

    fn atom(name: &str) -> Term {
        Term::atom(name)
    }

    fn var(name: &str) -> Term {
        Term::var(name)
    }

    fn list(arg: Term) -> Term {
        Term::apply(atom("List"), arg)
    }

    fn pair(a: Term, b: Term) -> Term {
        Term::app(atom("Pair"), [a, b])
    }

    /// `RepresentedAs t r`, keyed on `t`.
    fn represented_as(t: Term, r: Term) -> Term {
        Term::app(atom("RepresentedAs"), [t, r])
    }

    fn represented_as_fundeps() -> Rc<FunctionalDependencies> {
        Rc::new(FunctionalDependencies::new().with_key(|c| match c {
            Term::Apply(head, _) => match head.as_ref() {
                Term::Apply(name, _) if **name == Term::atom("RepresentedAs") => {
                    Some(head.as_ref().clone())
                }
                _ => None,
            },
            _ => None,
        }))
    }

    #[test]
    fn test_unify_equal_atoms() {
        let mut v = vars();
        v.unify_terms(&atom("Int"), &atom("Int")).unwrap();
        assert!(!v.failed());
    }

    #[test]
    fn test_unify_mismatched_atoms() {
        let mut v = vars();
        let result = v.unify_terms(&atom("Int"), &atom("String"));
        assert_eq!(result, Err(VarsError::Mismatch));
        assert_eq!(v.trace(), &["mismatching atoms: Int and String".to_string()]);
    }

    #[test]
    fn test_unify_atom_with_application() {
        let mut v = vars();
        assert!(v.unify_terms(&atom("Int"), &list(atom("Int"))).is_err());
        assert!(v.trace()[0].starts_with("could not match atom Int with application"));

        let mut v = vars();
        assert!(v.unify_terms(&list(atom("Int")), &atom("Int")).is_err());
        assert!(v.trace()[0].starts_with("could not match application"));
    }

    #[test]
    fn test_ground_terms_unify_without_bindings() {
        let samples = vec![
            atom("Int"),
            list(atom("Int")),
            pair(list(atom("A")), pair(atom("B"), atom("C"))),
        ];
        for term in samples {
            let mut v = vars();
            v.unify_terms(&term, &term).unwrap();
            assert_eq!(v.bound_count(), 0);
        }
    }

    #[test]
    fn test_unify_binds_variables() {
        let mut v = vars();
        v.unify_terms(&pair(var("a"), atom("B")), &pair(atom("A"), var("b")))
            .unwrap();
        assert_eq!(v.binding(&Atom::new("a")), Some(&atom("A")));
        assert_eq!(v.binding(&Atom::new("b")), Some(&atom("B")));
    }

    #[test]
    fn test_left_variable_is_bound() {
        let mut v = vars();
        v.unify_terms(&var("a"), &var("b")).unwrap();
        assert_eq!(v.binding(&Atom::new("a")), Some(&var("b")));
        assert_eq!(v.binding(&Atom::new("b")), None);
    }

    #[test]
    fn test_variable_unifies_with_itself() {
        let mut v = vars();
        v.unify_terms(&var("a"), &var("a")).unwrap();
        assert_eq!(v.bound_count(), 0);

        v.unify_terms(&var("a"), &var("b")).unwrap();
        v.unify_terms(&var("b"), &var("a")).unwrap();
        assert!(!v.failed());
    }

    #[test]
    fn test_bound_variable_recurses_into_binding() {
        let mut v = vars();
        v.unify_terms(&var("a"), &atom("Int")).unwrap();
        v.unify_terms(&var("a"), &atom("Int")).unwrap();
        assert!(v.unify_terms(&var("a"), &atom("String")).is_err());
        assert!(v.trace().iter().any(|line| line == "while unifying term @a with String"));
    }

    #[test]
    fn test_occurs_check_rejects_cycles() {
        let mut v = vars();
        let result = v.unify_terms(&var("a"), &list(var("a")));
        assert_eq!(result, Err(VarsError::Mismatch));
        assert_eq!(v.trace()[0], "occurs check failed");
        assert!(v.trace().iter().any(|line| line.contains("occurs in")));
        assert_eq!(v.bound_count(), 0);
    }

    #[test]
    fn test_occurs_check_follows_bindings() {
        let mut v = vars();
        v.unify_terms(&var("b"), &list(var("a"))).unwrap();
        assert!(v.unify_terms(&var("a"), &pair(var("b"), atom("Int"))).is_err());
        assert!(v.trace().iter().any(|line| line == "when resolving @b to List (@a)"));
    }

    #[test]
    fn test_occurs_in_matches_free_occurrence() {
        let mut v = vars();
        v.unify_terms(&var("b"), &list(var("a"))).unwrap();
        v.unify_terms(&var("c"), &atom("Int")).unwrap();

        let a = Atom::new("a");
        let cases = vec![
            (atom("Int"), false),
            (var("a"), true),
            (var("b"), true),
            (var("c"), false),
            (var("d"), false),
            (pair(var("c"), var("d")), false),
            (pair(var("c"), list(var("b"))), true),
        ];
        for (term, expected) in cases {
            assert_eq!(v.occurs_in(&a, &term), expected, "occurs_in(a, {term})");
        }
    }

    #[test]
    fn test_failed_vars_are_poisoned() {
        let mut v = vars();
        let _ = v.unify_terms(&atom("A"), &atom("B"));
        assert!(v.failed());
        assert_eq!(v.unify_terms(&atom("A"), &atom("A")), Err(VarsError::Poisoned));
        assert_eq!(v.constrain(&atom("Pure")), Err(VarsError::Poisoned));
        assert_eq!(
            v.instantiate_without_constraints(&atom("A")),
            Err(VarsError::Poisoned)
        );
        assert_eq!(v.trace().len(), 1);
    }

    #[test]
    fn test_instantiate_follows_chains() {
        let mut v = vars();
        v.unify_terms(&var("a"), &var("b")).unwrap();
        v.unify_terms(&var("b"), &list(var("c"))).unwrap();
        v.unify_terms(&var("c"), &atom("Int")).unwrap();
        assert_eq!(
            v.instantiate_without_constraints(&pair(var("a"), var("c"))).unwrap(),
            pair(list(atom("Int")), atom("Int"))
        );
    }

    #[test]
    fn test_unify_types_folds_constraints() {
        let mut v = vars();
        let show = |t: Term| Term::apply(atom("Show"), t);
        let t1 = Type::new(vec![show(var("a"))], var("a"));
        let t2 = Type::new(vec![show(var("b"))], list(var("a")));

        assert!(v.unify(&t1, &t2).is_err());
        // both constraints were stored before the terms failed the occurs check
        assert_eq!(v.constraints().len(), 2);
        assert!(v.trace().last().unwrap().starts_with("while unifying type"));
    }

    #[test]
    fn test_constraints_without_finder_key_stay_independent() {
        let mut v = vars();
        let show = |t: Term| Term::apply(atom("Show"), t);
        v.constrain(&show(var("a"))).unwrap();
        v.constrain(&show(var("b"))).unwrap();
        v.constrain(&show(atom("Int"))).unwrap();

        assert_eq!(v.constraints().len(), 3);
        assert_eq!(v.bound_count(), 0);
        assert_eq!(v.instantiate_without_constraints(&var("a")).unwrap(), var("a"));
    }

    #[test]
    fn test_constraint_identical_under_bindings_is_folded() {
        let mut v = vars();
        let show = |t: Term| Term::apply(atom("Show"), t);
        v.constrain(&show(var("a"))).unwrap();
        v.unify_terms(&var("a"), &atom("Int")).unwrap();
        v.constrain(&show(atom("Int"))).unwrap();

        assert_eq!(v.constraints(), &[show(atom("Int"))]);
    }

    #[test]
    fn test_constrain_keeps_independent_constraints() {
        let mut v = vars();
        let convert = |to: &str| Term::app(atom("CanConvert"), [atom("Int"), atom(to)]);
        v.constrain(&convert("Double")).unwrap();
        v.constrain(&convert("Float")).unwrap();
        assert_eq!(v.constraints().len(), 2);
        assert_eq!(v.bound_count(), 0);
    }

    #[test]
    fn test_constrain_identical_constraint_is_deduplicated() {
        let mut v = vars();
        v.constrain(&atom("Pure")).unwrap();
        v.constrain(&atom("Pure")).unwrap();
        assert_eq!(v.constraints(), &[atom("Pure")]);
    }

    #[test]
    fn test_fundep_forces_agreement() {
        let mut v = Vars::new(represented_as_fundeps());
        v.constrain(&represented_as(atom("Int"), atom("Bit64"))).unwrap();
        v.constrain(&represented_as(atom("Int"), var("r"))).unwrap();

        assert_eq!(v.constraints().len(), 1);
        assert_eq!(v.binding(&Atom::new("r")), Some(&atom("Bit64")));
    }

    #[test]
    fn test_fundep_conflict_fails() {
        let mut v = Vars::new(represented_as_fundeps());
        v.constrain(&represented_as(atom("Int"), atom("Bit64"))).unwrap();
        let result = v.constrain(&represented_as(atom("Int"), atom("Bit32")));

        assert_eq!(result, Err(VarsError::Mismatch));
        assert!(
            v.trace()
                .last()
                .unwrap()
                .starts_with("while unifying new constraint")
        );
    }

    #[test]
    fn test_fundep_different_keys_coexist() {
        let mut v = Vars::new(represented_as_fundeps());
        v.constrain(&represented_as(atom("Int"), atom("Bit64"))).unwrap();
        v.constrain(&represented_as(atom("Bool"), atom("Bit8"))).unwrap();
        assert_eq!(v.constraints().len(), 2);
    }

    #[test]
    fn test_failed_key_match_leaves_no_bindings() {
        let mut v = Vars::new(represented_as_fundeps());
        v.constrain(&represented_as(pair(var("x"), atom("Int")), atom("Bit64")))
            .unwrap();
        // The key unification binds x := Bool before failing on Int vs String.
        v.constrain(&represented_as(pair(atom("Bool"), atom("String")), atom("Bit32")))
            .unwrap();

        assert!(!v.failed());
        assert_eq!(v.binding(&Atom::new("x")), None);
        assert_eq!(v.constraints().len(), 2);
    }

    #[test]
    fn test_instantiate_with_salient_constraints() {
        let mut v = vars();
        let show = |t: Term| Term::apply(atom("Show"), t);
        let eq = |t: Term| Term::apply(atom("Eq"), t);
        v.constrain(&show(var("a"))).unwrap();
        v.constrain(&eq(var("b"))).unwrap();
        v.constrain(&atom("Pure")).unwrap();
        v.unify_terms(&var("c"), &var("a")).unwrap();

        let ty = v.instantiate_with_constraints(&list(var("c"))).unwrap();
        assert_eq!(ty, Type::new(vec![show(var("a"))], list(var("a"))));
    }

    #[test]
    fn test_instantiated_constraints_are_substituted() {
        let mut v = vars();
        let show = |t: Term| Term::apply(atom("Show"), t);
        v.constrain(&show(var("a"))).unwrap();
        v.unify_terms(&var("a"), &list(var("e"))).unwrap();

        let ty = v.instantiate_with_constraints(&var("a")).unwrap();
        assert_eq!(ty.constraints(), &[show(list(var("e")))]);
        assert_eq!(ty.term(), &list(var("e")));
    }

    #[test]
    fn test_instantiate_keeps_unconstrained_type_constraints() {
        let mut v = vars();
        let show = |t: Term| Term::apply(atom("Show"), t);
        v.unify_terms(&var("a"), &list(var("e"))).unwrap();

        let stored = Type::new(vec![show(var("a")), show(var("z"))], var("a"));
        let ty = v.instantiate(&stored).unwrap();
        assert_eq!(ty, Type::new(vec![show(list(var("e")))], list(var("e"))));
    }

    #[test]
    fn test_ground_constraints_are_never_salient() {
        let mut v = vars();
        v.constrain(&Term::apply(atom("Show"), atom("Int"))).unwrap();
        let ty = v.instantiate_with_constraints(&atom("Int")).unwrap();
        assert!(ty.constraints().is_empty());
    }
}
