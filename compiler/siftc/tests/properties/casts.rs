//! Cast and null-assert failures are errors, never refutations.

use pretty_assertions::assert_eq;
use sift_ir::{PatternMode, Span};
use sift_match::{EvalErrorKind, Value};
use sift_types::{CatchAllOracle, Idx};
use siftc::SwitchCase;

use crate::common::{check, Patterns, World};

fn case(pattern: sift_ir::PatternId, start: u32) -> SwitchCase {
    SwitchCase {
        pattern,
        guarded: false,
        span: Span::new(start, start + 1),
    }
}

#[test]
fn failed_cast_is_not_caught_by_a_later_case() {
    let world = World::new();
    let mut engine = world.engine();
    let mut p = Patterns::new();
    let v = p.arena.var(world.name("v"));
    let as_int = p.arena.cast(v, world.ty("int"));
    let fallback = p.arena.wildcard();
    let cases = [case(as_int, 0), case(fallback, 1)];
    let oracle = CatchAllOracle::new(&world.registry);
    let (checked, diagnostics) =
        engine.type_check_switch(p.source(), &cases, Idx::OBJECT_Q, Span::new(0, 2), true, &oracle);
    assert!(!checked.has_errors(), "{diagnostics:?}");
    let mut host = world.host();

    let err = engine
        .match_switch(&p.arena, &checked, &Value::string("s"), &mut host, |_, _| Ok(true))
        .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::CastFailed {
            found: "String".to_string(),
            expected: "int".to_string(),
        }
    );

    let found = engine
        .match_switch(&p.arena, &checked, &Value::Int(4), &mut host, |_, _| Ok(true))
        .unwrap()
        .unwrap();
    assert_eq!(found.case, 0);
}

#[test]
fn null_assert_throws_where_null_check_refutes() {
    let world = World::new();
    let mut engine = world.engine();
    let mut p = Patterns::new();
    let nullable = engine.pool_mut().nullable(Idx::INT);

    let v = p.arena.var(world.name("v"));
    let checked_null = p.arena.null_check(v);
    let checked = check(&mut engine, &p, checked_null, PatternMode::Matching, nullable);
    let mut host = world.host();
    let result = engine
        .match_pattern(&p.arena, &checked, &Value::Null, &mut host)
        .unwrap();
    assert!(!result.is_matched());

    let v = p.arena.var(world.name("v"));
    let asserted = p.arena.null_assert(v);
    let checked = check(&mut engine, &p, asserted, PatternMode::Matching, nullable);
    let err = engine
        .match_pattern(&p.arena, &checked, &Value::Null, &mut host)
        .unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::NullAssertFailed);

    let bound = engine
        .match_pattern(&p.arena, &checked, &Value::Int(3), &mut host)
        .unwrap()
        .into_bindings()
        .unwrap();
    assert_eq!(bound.get(world.name("v")), Some(&Value::Int(3)));
}
