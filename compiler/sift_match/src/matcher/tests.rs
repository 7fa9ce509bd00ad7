use pretty_assertions::assert_eq;
use sift_ir::{PatternMode, RelationalOp};
use sift_types::{ClassDef, Idx};

use super::*;
use crate::errors::EvalErrorKind;
use crate::test_helpers::{bound, Fixture, World};

fn ints(values: &[i64]) -> Value {
    Value::list(Idx::INT, values.iter().map(|&v| Value::Int(v)).collect())
}

const DECLARE: PatternMode = PatternMode::Declaration { is_final: false };

#[test]
fn rest_element_binds_the_middle() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    let (a, mid, b) = (f.name("a"), f.name("mid"), f.name("b"));
    let va = f.arena.var(a);
    let vmid = f.arena.var(mid);
    let rest = f.arena.rest(Some(vmid));
    let vb = f.arena.var(b);
    let root = f.arena.list_pattern(&[va, rest, vb]);
    let matched = f.pool.list(Idx::INT);

    let result = f.run(root, matched, &ints(&[1, 2, 3, 4, 5]));
    assert_eq!(
        bound(result),
        Some(vec![
            (a, Value::Int(1)),
            (mid, ints(&[2, 3, 4])),
            (b, Value::Int(5)),
        ])
    );
}

#[test]
fn list_length_must_fit() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    let (a, b) = (f.name("a"), f.name("b"));
    let va = f.arena.var(a);
    let vb = f.arena.var(b);
    let exact = f.arena.list_pattern(&[va, vb]);
    let matched = f.pool.list(Idx::INT);

    assert_eq!(bound(f.run(exact, matched, &ints(&[1]))), None);
    assert_eq!(bound(f.run(exact, matched, &ints(&[1, 2, 3]))), None);
    assert!(bound(f.run(exact, matched, &ints(&[1, 2]))).is_some());

    let empty = f.arena.list_pattern(&[]);
    assert_eq!(bound(f.run(empty, matched, &ints(&[]))), Some(vec![]));
    assert_eq!(bound(f.run(empty, matched, &ints(&[1]))), None);

    let va = f.arena.var(a);
    let rest = f.arena.rest(None);
    let at_least_one = f.arena.list_pattern(&[va, rest]);
    assert_eq!(bound(f.run(at_least_one, matched, &ints(&[]))), None);
    assert_eq!(
        bound(f.run(at_least_one, matched, &ints(&[7, 8, 9]))),
        Some(vec![(a, Value::Int(7))])
    );
}

#[test]
fn lone_rest_reads_nothing() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    let rest = f.arena.rest(None);
    let root = f.arena.list_pattern(&[rest]);
    let matched = f.pool.list(Idx::INT);
    let mut host = world.recording_host();

    let result = f.run_with(root, PatternMode::Matching, matched, &ints(&[1, 2]), &mut host);
    assert!(result.unwrap().is_matched());
    assert!(host.log().is_empty());
}

#[test]
fn wildcard_elements_are_not_read() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    let b = f.name("b");
    let skip = f.arena.wildcard();
    let vb = f.arena.var(b);
    let root = f.arena.list_pattern(&[skip, vb]);
    let matched = f.pool.list(Idx::INT);
    let mut host = world.recording_host();

    let result = f.run_with(root, PatternMode::Matching, matched, &ints(&[1, 2]), &mut host);
    assert_eq!(bound(result), Some(vec![(b, Value::Int(2))]));
    assert_eq!(host.log(), ["length".to_string(), "[1]".to_string()]);
}

#[test]
fn logical_or_short_circuits_and_rolls_back() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    let (one, two) = (f.int(1), f.int(2));
    let left = f.arena.constant(one);
    let right = f.arena.constant(two);
    let root = f.arena.or(left, right);
    let mut host = world.recording_host();

    let result = f.run_with(root, PatternMode::Matching, Idx::INT, &Value::Int(1), &mut host);
    assert!(result.unwrap().is_matched());
    assert_eq!(host.log(), ["1 == 1".to_string()]);

    // `[a, 1] || [a, 2]` keeps only the bindings of the branch that matched.
    let a = f.name("a");
    let (one, two) = (f.int(1), f.int(2));
    let va = f.arena.var(a);
    let c1 = f.arena.constant(one);
    let left = f.arena.list_pattern(&[va, c1]);
    let va = f.arena.var(a);
    let c2 = f.arena.constant(two);
    let right = f.arena.list_pattern(&[va, c2]);
    let root = f.arena.or(left, right);
    let matched = f.pool.list(Idx::INT);
    assert_eq!(
        bound(f.run(root, matched, &ints(&[5, 2]))),
        Some(vec![(a, Value::Int(5))])
    );
}

#[test]
fn repeated_getter_runs_once() {
    let mut world = World::new();
    let (point, x) = (world.name("Point"), world.name("x"));
    let int = world.ty("int");
    world
        .registry
        .define_class(ClassDef::new(point).with_getter(x, int));
    let mut f = Fixture::new(&world);

    let (zero, ten) = (f.int(0), f.int(10));
    let positive = f.arena.relational(RelationalOp::Gt, zero);
    let small = f.arena.relational(RelationalOp::Lt, ten);
    let ty = f.ty("Point");
    let root = f.arena.object(ty, &[(x, positive), (x, small)]);
    let matched = f.pool.named(point, &[]);
    let subject = Value::object(matched, vec![(x, Value::Int(5))]);
    let mut host = world.recording_host();

    let result = f.run_with(root, PatternMode::Matching, matched, &subject, &mut host);
    assert!(result.unwrap().is_matched());
    assert_eq!(host.getter_calls(x), 1);
}

#[test]
fn object_getters_run_even_for_wildcards() {
    let mut world = World::new();
    let (point, x) = (world.name("Point"), world.name("x"));
    let int = world.ty("int");
    world
        .registry
        .define_class(ClassDef::new(point).with_getter(x, int));
    let mut f = Fixture::new(&world);

    let skip = f.arena.wildcard();
    let ty = f.ty("Point");
    let root = f.arena.object(ty, &[(x, skip)]);
    let matched = f.pool.named(point, &[]);
    let subject = Value::object(matched, vec![(x, Value::Int(5))]);
    let mut host = world.recording_host();

    let result = f.run_with(root, PatternMode::Matching, matched, &subject, &mut host);
    assert!(result.unwrap().is_matched());
    assert_eq!(host.log(), ["get x".to_string()]);
}

#[test]
fn getter_errors_abort_the_match() {
    let mut world = World::new();
    let (point, x) = (world.name("Point"), world.name("x"));
    let int = world.ty("int");
    world
        .registry
        .define_class(ClassDef::new(point).with_getter(x, int));
    let mut f = Fixture::new(&world);

    let vx = f.arena.var(x);
    let ty = f.ty("Point");
    let root = f.arena.object(ty, &[(x, vx)]);
    let matched = f.pool.named(point, &[]);
    let subject = Value::object(matched, vec![(x, Value::Int(5))]);
    let mut host = world.recording_host().failing_getter(x, "boom");

    let err = f
        .run_with(root, PatternMode::Matching, matched, &subject, &mut host)
        .unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::Host { message: "boom".to_string() });
}

#[test]
fn absent_key_with_non_nullable_values_skips_presence_check() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    let v = f.name("v");
    let key = f.string("b");
    let vv = f.arena.var(v);
    let root = f.arena.map(&[(key, vv)]);
    let matched = f.pool.map(Idx::STR, Idx::INT);
    let subject = Value::map(Idx::STR, Idx::INT, vec![(Value::string("a"), Value::Int(1))]);
    let mut host = world.recording_host();

    let result = f.run_with(root, PatternMode::Matching, matched, &subject, &mut host);
    assert_eq!(bound(result), None);
    assert_eq!(host.log().len(), 1);
    assert!(!host.log().iter().any(|l| l.starts_with("containsKey")));
}

#[test]
fn null_lookup_with_nullable_values_checks_presence() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    let v = f.name("v");
    let nullable_int = f.pool.nullable(Idx::INT);
    let matched = f.pool.map(Idx::STR, nullable_int);
    let subject = Value::map(Idx::STR, nullable_int, vec![(Value::string("a"), Value::Null)]);

    let present = f.string("a");
    let vv = f.arena.var(v);
    let root = f.arena.map(&[(present, vv)]);
    assert_eq!(bound(f.run(root, matched, &subject)), Some(vec![(v, Value::Null)]));

    let absent = f.string("b");
    let vv = f.arena.var(v);
    let root = f.arena.map(&[(absent, vv)]);
    let mut host = world.recording_host();
    let result = f.run_with(root, PatternMode::Matching, matched, &subject, &mut host);
    assert_eq!(bound(result), None);
    assert!(host.log().iter().any(|l| l.starts_with("containsKey")));
}

#[test]
fn unsound_null_safety_always_checks_presence() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    f.config = MatchConfig::default().with_sound_null_safety(false);
    let v = f.name("v");
    let key = f.string("b");
    let vv = f.arena.var(v);
    let root = f.arena.map(&[(key, vv)]);
    let matched = f.pool.map(Idx::STR, Idx::INT);
    let subject = Value::map(Idx::STR, Idx::INT, vec![]);
    let mut host = world.recording_host();

    let result = f.run_with(root, PatternMode::Matching, matched, &subject, &mut host);
    assert_eq!(bound(result), None);
    assert!(host.log().iter().any(|l| l.starts_with("containsKey")));
}

#[test]
fn records_bind_positional_and_named_fields() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    let (a, label, n) = (f.name("a"), f.name("label"), f.name("n"));
    let va = f.arena.var(a);
    let vn = f.arena.var(n);
    let root = f.arena.record(&[(None, va), (Some(label), vn)]);
    let matched = f.pool.record(&[Idx::INT], &[(label, Idx::STR)]);
    let subject = Value::record(vec![Value::Int(1)], vec![(label, Value::string("x"))]);

    assert_eq!(
        bound(f.run(root, matched, &subject)),
        Some(vec![(a, Value::Int(1)), (n, Value::string("x"))])
    );
}

#[test]
fn cast_mismatch_is_fatal_even_when_matching() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    let x = f.name("x");
    let vx = f.arena.var(x);
    let int = f.ty("int");
    let root = f.arena.cast(vx, int);

    assert_eq!(
        bound(f.run(root, Idx::OBJECT_Q, &Value::Int(3))),
        Some(vec![(x, Value::Int(3))])
    );
    let err = f.run(root, Idx::OBJECT_Q, &Value::string("s")).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::CastFailed { .. }), "{err}");
}

#[test]
fn null_check_refutes_and_null_assert_throws() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    let x = f.name("x");
    let nullable_int = f.pool.nullable(Idx::INT);

    let vx = f.arena.var(x);
    let check = f.arena.null_check(vx);
    assert_eq!(bound(f.run(check, nullable_int, &Value::Null)), None);
    assert_eq!(
        bound(f.run(check, nullable_int, &Value::Int(3))),
        Some(vec![(x, Value::Int(3))])
    );

    let vx = f.arena.var(x);
    let asserted = f.arena.null_assert(vx);
    let err = f.run(asserted, nullable_int, &Value::Null).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::NullAssertFailed);
}

#[test]
fn typed_variable_refutes_when_matching_and_throws_when_declaring() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    let x = f.name("x");
    let int = f.ty("int");
    let root = f.arena.typed_var(int, x);

    assert_eq!(bound(f.run(root, Idx::OBJECT_Q, &Value::string("s"))), None);

    let mut host = world.host();
    let ok = f.run_with(root, DECLARE, Idx::DYNAMIC, &Value::Int(4), &mut host);
    assert_eq!(bound(ok), Some(vec![(x, Value::Int(4))]));
    let err = f
        .run_with(root, DECLARE, Idx::DYNAMIC, &Value::string("s"), &mut host)
        .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::CastFailed { .. }), "{err}");
}

#[test]
fn refuted_declaration_is_fatal() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    let (a, b) = (f.name("a"), f.name("b"));
    let va = f.arena.var(a);
    let vb = f.arena.var(b);
    let root = f.arena.list_pattern(&[va, vb]);
    let matched = f.pool.list(Idx::INT);
    let mut host = world.host();

    let err = f
        .run_with(root, DECLARE, matched, &ints(&[1, 2, 3]), &mut host)
        .unwrap_err();
    assert!(
        matches!(err.kind, EvalErrorKind::IrrefutableMatchFailed { .. }),
        "{err}"
    );
}

#[test]
fn relational_patterns_against_null() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    let nullable_int = f.pool.nullable(Idx::INT);
    let (null, five) = (f.null(), f.int(5));

    let is_null = f.arena.relational(RelationalOp::Eq, null);
    assert!(bound(f.run(is_null, nullable_int, &Value::Null)).is_some());
    assert!(bound(f.run(is_null, nullable_int, &Value::Int(1))).is_none());

    let not_null = f.arena.relational(RelationalOp::NotEq, null);
    assert!(bound(f.run(not_null, nullable_int, &Value::Int(1))).is_some());

    let less = f.arena.relational(RelationalOp::Lt, five);
    assert!(bound(f.run(less, nullable_int, &Value::Null)).is_none());
    assert!(bound(f.run(less, nullable_int, &Value::Int(4))).is_some());
}

#[test]
fn non_bool_operator_result_is_fatal() {
    let mut world = World::new();
    let boxed = world.name("Box");
    let (int, dynamic) = (world.ty("int"), world.ty("dynamic"));
    world
        .registry
        .define_class(ClassDef::new(boxed).with_operator(RelationalOp::Lt, int, dynamic));
    let mut f = Fixture::new(&world);

    let one = f.int(1);
    let root = f.arena.relational(RelationalOp::Lt, one);
    let matched = f.pool.named(boxed, &[]);
    let subject = Value::object(matched, vec![]);
    let mut host = world
        .host()
        .with_operator(RelationalOp::Lt, |_, _| Ok(Value::Int(1)));

    let err = f
        .run_with(root, PatternMode::Matching, matched, &subject, &mut host)
        .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::NonBoolComparison {
            op: RelationalOp::Lt,
            found: "1".to_string(),
        }
    );
}

#[test]
fn disabling_elision_keeps_results() {
    let world = World::new();
    let mut f = Fixture::new(&world);
    f.config = MatchConfig::default().with_elide_type_tests(false);
    let (a, b) = (f.name("a"), f.name("b"));
    let va = f.arena.var(a);
    let vb = f.arena.var(b);
    let root = f.arena.list_pattern(&[va, vb]);
    let matched = f.pool.list(Idx::INT);

    assert_eq!(
        bound(f.run(root, matched, &ints(&[1, 2]))),
        Some(vec![(a, Value::Int(1)), (b, Value::Int(2))])
    );
}
