//! An access path is evaluated at most once per match attempt.

use pretty_assertions::assert_eq;
use sift_ir::{PatternMode, RelationalOp, Span};
use sift_match::Value;
use sift_types::CatchAllOracle;
use siftc::SwitchCase;

use crate::common::{check, Patterns, World};

#[test]
fn repeated_getter_in_one_pattern_runs_once() {
    let world = World::with_point();
    let (point, x) = (world.name("Point"), world.name("x"));
    let mut engine = world.engine();
    let mut p = Patterns::new();
    let skip = p.arena.wildcard();
    let ten = p.int(10);
    let small = p.arena.relational(RelationalOp::Lt, ten);
    let root = p.arena.object(world.ty("Point"), &[(x, skip), (x, small)]);
    let matched = engine.pool_mut().named(point, &[]);
    let checked = check(&mut engine, &p, root, PatternMode::Matching, matched);
    let subject = Value::object(matched, vec![(x, Value::Int(3))]);
    let mut host = world.recording();

    let result = engine
        .match_pattern(&p.arena, &checked, &subject, &mut host)
        .unwrap();
    assert!(result.is_matched());
    assert_eq!(host.getter_calls(x), 1);
}

#[test]
fn getter_shared_by_switch_cases_runs_once() {
    let world = World::with_point();
    let (point, x, y) = (world.name("Point"), world.name("x"), world.name("y"));
    let mut engine = world.engine();
    let mut p = Patterns::new();

    // case Point(x: 0): case Point(x: 1): case Point(x: var v, y: _):
    let mut cases = Vec::new();
    for (start, constant) in [(0, 0), (1, 1)] {
        let c = p.int(constant);
        let pattern = p.arena.constant(c);
        let case = p.arena.object(world.ty("Point"), &[(x, pattern)]);
        cases.push(SwitchCase {
            pattern: case,
            guarded: false,
            span: Span::new(start, start + 1),
        });
    }
    let v = p.arena.var(world.name("v"));
    let skip = p.arena.wildcard();
    let last = p.arena.object(world.ty("Point"), &[(x, v), (y, skip)]);
    cases.push(SwitchCase {
        pattern: last,
        guarded: false,
        span: Span::new(2, 3),
    });

    let matched = engine.pool_mut().named(point, &[]);
    let oracle = CatchAllOracle::new(&world.registry);
    let (checked, diagnostics) =
        engine.type_check_switch(p.source(), &cases, matched, Span::new(0, 3), false, &oracle);
    assert!(!checked.has_errors(), "{diagnostics:?}");

    let subject = Value::object(matched, vec![(x, Value::Int(7)), (y, Value::Int(8))]);
    let mut host = world.recording();
    let found = engine
        .match_switch(&p.arena, &checked, &subject, &mut host, |_, _| Ok(true))
        .unwrap()
        .unwrap();

    assert_eq!(found.case, 2);
    assert_eq!(found.bindings.get(world.name("v")), Some(&Value::Int(7)));
    assert_eq!(host.getter_calls(x), 1);
    assert_eq!(host.getter_calls(y), 1);
}
