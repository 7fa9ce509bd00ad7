//! Cases falling into one body share only identically bound variables.

use pretty_assertions::assert_eq;
use sift_ir::Span;
use sift_match::{Environment, Value};
use sift_types::{CatchAllOracle, Idx, SharedBinding};
use siftc::{CheckedSwitch, SwitchCase};

use crate::common::{Patterns, World};

fn two_cases(world: &World, p: &mut Patterns, second_type: &str) -> [SwitchCase; 2] {
    let x = world.name("x");
    let first = p.arena.typed_var(world.ty("int"), x);
    let inner = p.arena.var(x);
    let second = p.arena.cast(inner, world.ty(second_type));
    [
        SwitchCase {
            pattern: first,
            guarded: false,
            span: Span::new(0, 1),
        },
        SwitchCase {
            pattern: second,
            guarded: false,
            span: Span::new(2, 3),
        },
    ]
}

fn check_switch(
    engine: &mut siftc::PatternEngine<'_>,
    world: &World,
    p: &Patterns,
    cases: &[SwitchCase],
) -> CheckedSwitch {
    let oracle = CatchAllOracle::new(&world.registry);
    let (checked, diagnostics) =
        engine.type_check_switch(p.source(), cases, Idx::OBJECT_Q, Span::new(0, 3), false, &oracle);
    assert!(!checked.has_errors(), "{diagnostics:?}");
    checked
}

#[test]
fn identically_bound_variable_is_shared() {
    let world = World::new();
    let x = world.name("x");
    let mut engine = world.engine();
    let mut p = Patterns::new();
    let cases = two_cases(&world, &mut p, "int");
    let checked = check_switch(&mut engine, &world, &p, &cases);

    let scope = engine.resolve_shared_scope(&checked.variables);
    assert!(matches!(scope.get(x), Some(SharedBinding::Shared(b)) if b.ty == Idx::INT));

    let mut host = world.host();
    let found = engine
        .match_switch(&p.arena, &checked, &Value::Int(5), &mut host, |_, _| Ok(true))
        .unwrap()
        .unwrap();
    let mut env = Environment::new();
    env.enter_shared_scope(&scope, &found.bindings);
    assert_eq!(env.lookup(x), Some(Value::Int(5)));
}

#[test]
fn differently_typed_variable_is_unusable_but_seen_by_guards() {
    let world = World::new();
    let x = world.name("x");
    let mut engine = world.engine();
    let mut p = Patterns::new();
    let cases = two_cases(&world, &mut p, "String");
    let checked = check_switch(&mut engine, &world, &p, &cases);

    let scope = engine.resolve_shared_scope(&checked.variables);
    assert_eq!(scope.get(x), Some(&SharedBinding::Unusable { name: x }));
    assert!(scope.lookup(x, Span::new(4, 5)).is_err());

    let mut host = world.host();
    let mut guard_saw = Vec::new();
    let found = engine
        .match_switch(&p.arena, &checked, &Value::string("s"), &mut host, |case, bindings| {
            guard_saw.push((case, bindings.get(x).cloned()));
            Ok(true)
        })
        .unwrap()
        .unwrap();
    assert_eq!(found.case, 1);
    assert_eq!(guard_saw, vec![(1, Some(Value::string("s")))]);

    let mut env = Environment::new();
    env.enter_shared_scope(&scope, &found.bindings);
    assert_eq!(env.lookup(x), None);
}
