//! Assignment patterns write all of their targets or none of them.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sift_diagnostic::ErrorCode;
use sift_ir::PatternMode;
use sift_match::{Environment, EvalErrorKind, Mutability, Value};
use sift_types::{Idx, Subject};

use crate::common::{Patterns, World};

proptest! {
    #[test]
    fn swap_exchanges_values(first in any::<i64>(), second in any::<i64>()) {
        let world = World::new();
        let (a, b) = (world.name("a"), world.name("b"));
        let mut engine = world.engine();
        let mut p = Patterns::new();
        p.env.define_variable(a, Idx::INT, false);
        p.env.define_variable(b, Idx::INT, false);
        let ta = p.arena.ident(a);
        let tb = p.arena.ident(b);
        let root = p.arena.record(&[(None, ta), (None, tb)]);
        let matched = engine.pool_mut().record(&[Idx::INT, Idx::INT], &[]);
        let (checked, diagnostics) = engine.type_check_pattern(
            p.source(),
            root,
            PatternMode::Assignment,
            Subject::Typed(matched),
        );
        prop_assert!(diagnostics.is_empty(), "{:?}", diagnostics);

        let mut env = Environment::new();
        env.define(a, Value::Int(first), Mutability::Mutable);
        env.define(b, Value::Int(second), Mutability::Mutable);

        // (a, b) = (b, a)
        let subject = Value::record(
            vec![env.lookup(b).unwrap(), env.lookup(a).unwrap()],
            vec![],
        );
        let mut host = world.host();
        let bindings = engine
            .match_pattern(&p.arena, &checked, &subject, &mut host)
            .unwrap()
            .into_bindings()
            .unwrap();
        engine.apply_bindings(&mut env, &checked, &bindings).unwrap();

        prop_assert_eq!(env.lookup(a), Some(Value::Int(second)));
        prop_assert_eq!(env.lookup(b), Some(Value::Int(first)));
    }
}

#[test]
fn failed_implicit_cast_writes_nothing() {
    let world = World::new();
    let (a, b) = (world.name("a"), world.name("b"));
    let mut engine = world.engine();
    let mut p = Patterns::new();
    p.env.define_variable(a, Idx::INT, false);
    p.env.define_variable(b, Idx::INT, false);
    let ta = p.arena.ident(a);
    let tb = p.arena.ident(b);
    let root = p.arena.record(&[(None, ta), (None, tb)]);
    let matched = engine
        .pool_mut()
        .record(&[Idx::INT, Idx::DYNAMIC], &[]);
    let (checked, diagnostics) = engine.type_check_pattern(
        p.source(),
        root,
        PatternMode::Assignment,
        Subject::Typed(matched),
    );
    assert!(diagnostics.is_empty(), "{diagnostics:?}");

    let mut env = Environment::new();
    env.define(a, Value::Int(1), Mutability::Mutable);
    env.define(b, Value::Int(2), Mutability::Mutable);

    let subject = Value::record(vec![Value::Int(9), Value::string("x")], vec![]);
    let mut host = world.host();
    let err = engine
        .match_pattern(&p.arena, &checked, &subject, &mut host)
        .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::CastFailed {
            found: "String".to_string(),
            expected: "int".to_string(),
        }
    );
    assert_eq!(env.lookup(a), Some(Value::Int(1)));
    assert_eq!(env.lookup(b), Some(Value::Int(2)));
}

#[test]
fn rejected_target_writes_nothing() {
    let world = World::new();
    let (a, b) = (world.name("a"), world.name("b"));
    let mut engine = world.engine();
    let mut p = Patterns::new();
    p.env.define_variable(a, Idx::INT, false);
    p.env.define_variable(b, Idx::INT, false);
    let ta = p.arena.ident(a);
    let tb = p.arena.ident(b);
    let root = p.arena.record(&[(None, ta), (None, tb)]);
    let matched = engine.pool_mut().record(&[Idx::INT, Idx::INT], &[]);
    let (checked, _) = engine.type_check_pattern(
        p.source(),
        root,
        PatternMode::Assignment,
        Subject::Typed(matched),
    );

    // `b` exists statically but was never defined in this environment.
    let mut env = Environment::new();
    env.define(a, Value::Int(1), Mutability::Mutable);

    let subject = Value::record(vec![Value::Int(3), Value::Int(4)], vec![]);
    let mut host = world.host();
    let bindings = engine
        .match_pattern(&p.arena, &checked, &subject, &mut host)
        .unwrap()
        .into_bindings()
        .unwrap();
    let err = engine
        .apply_bindings(&mut env, &checked, &bindings)
        .unwrap_err();

    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedVariable {
            name: "b".to_string()
        }
    );
    assert_eq!(env.lookup(a), Some(Value::Int(1)));
}

#[test]
fn declaring_inside_assignment_is_rejected_before_matching() {
    let world = World::new();
    let (a, c) = (world.name("a"), world.name("c"));
    let mut engine = world.engine();
    let mut p = Patterns::new();
    p.env.define_variable(a, Idx::INT, false);

    // (a, var c) = ...
    let ta = p.arena.ident(a);
    let vc = p.arena.var(c);
    let root = p.arena.record(&[(None, ta), (None, vc)]);
    let matched = engine.pool_mut().record(&[Idx::INT, Idx::INT], &[]);
    let (checked, diagnostics) = engine.type_check_pattern(
        p.source(),
        root,
        PatternMode::Assignment,
        Subject::Typed(matched),
    );

    assert!(checked.has_errors());
    let codes: Vec<_> = diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E3021]);
    assert!(diagnostics[0].message.contains("`c`"));
}
