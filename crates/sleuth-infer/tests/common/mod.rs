// Common test utilities for integration tests
//
// Sample rules for a tiny language with integer and string literals plus
// type assertions, and helpers for building inferrers around them.

#![allow(dead_code)]

use sleuth_infer::{Atom, Free, FunctionalDependencies, Inferrer, Term, Tools, Type};

/// Payload of a clue in the sample language.
#[derive(Debug, Clone)]
pub enum Constant {
    Int(i64),
    Str(String),
    /// The clue has the given type, and so does its single dependency.
    Assert(Free<Type>),
    None,
}

pub type Source = &'static str;

/// Types integer and string literals.
pub fn constant_rule(tools: &mut dyn Tools<Constant>) {
    if tools.kind(0) != Some(&Atom::new("ConstantValue")) {
        tools.fail("not a constant", &[]);
        return;
    }
    tools.preconditions_are_satisfied();

    let ty = match tools.constant(0) {
        Some(Constant::Int(_)) => Type::atom("Int"),
        Some(Constant::Str(_)) => Type::atom("String"),
        _ => {
            tools.fail("unsupported constant", &[0]);
            return;
        }
    };
    tools.unify_free(&Free::new(ty), 0);
}

/// Forces a clue and its dependency to the asserted type.
pub fn assert_rule(tools: &mut dyn Tools<Constant>) {
    if tools.kind(0) != Some(&Atom::new("AssertType")) {
        tools.fail("not a type assertion", &[]);
        return;
    }
    let asserted = match tools.constant(0) {
        Some(Constant::Assert(ty)) => ty.clone(),
        _ => {
            tools.fail("assertion without a type", &[0]);
            return;
        }
    };
    tools.preconditions_are_satisfied();
    tools.unify_clues(0, 1);
    tools.unify_free(&asserted, 0);
}

/// An inferrer with the sample rules registered.
pub fn create_inferrer() -> Inferrer<Source, Constant> {
    create_inferrer_with(FunctionalDependencies::new())
}

pub fn create_inferrer_with(fundeps: FunctionalDependencies) -> Inferrer<Source, Constant> {
    let mut inferrer = Inferrer::new(fundeps);
    inferrer.create_rule(constant_rule);
    inferrer.create_rule(assert_rule);
    inferrer
}

pub fn assert_type(name: &str) -> Constant {
    Constant::Assert(Free::new(Type::atom(name)))
}

pub fn free_atom(name: &str) -> Free<Type> {
    Free::new(Type::atom(name))
}

pub fn list(arg: Term) -> Term {
    Term::apply(Term::atom("List"), arg)
}
