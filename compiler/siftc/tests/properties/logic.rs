//! `||` and `&&` evaluate their right operand only when they must.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sift_ir::{PatternMode, RelationalOp};
use sift_match::Value;
use sift_types::Idx;

use crate::common::{check, Patterns, World};

#[test]
fn or_skips_right_branch_after_a_match() {
    let world = World::with_point();
    let (point, x, y) = (world.name("Point"), world.name("x"), world.name("y"));
    let mut engine = world.engine();
    let mut p = Patterns::new();
    let skip_x = p.arena.wildcard();
    let left = p.arena.object(world.ty("Point"), &[(x, skip_x)]);
    let skip_y = p.arena.wildcard();
    let right = p.arena.object(world.ty("Point"), &[(y, skip_y)]);
    let root = p.arena.or(left, right);
    let matched = engine.pool_mut().named(point, &[]);
    let checked = check(&mut engine, &p, root, PatternMode::Matching, matched);
    let subject = Value::object(matched, vec![(x, Value::Int(1)), (y, Value::Int(2))]);
    let mut host = world.recording();

    let result = engine
        .match_pattern(&p.arena, &checked, &subject, &mut host)
        .unwrap();
    assert!(result.is_matched());
    assert_eq!(host.getter_calls(x), 1);
    assert_eq!(host.getter_calls(y), 0);
}

#[test]
fn and_skips_right_branch_after_a_refutation() {
    let world = World::with_point();
    let (point, x, y) = (world.name("Point"), world.name("x"), world.name("y"));
    let mut engine = world.engine();
    let mut p = Patterns::new();
    let zero = p.int(0);
    let positive_x = p.arena.relational(RelationalOp::Gt, zero);
    let left = p.arena.object(world.ty("Point"), &[(x, positive_x)]);
    let zero = p.int(0);
    let positive_y = p.arena.relational(RelationalOp::Gt, zero);
    let right = p.arena.object(world.ty("Point"), &[(y, positive_y)]);
    let root = p.arena.and(left, right);
    let matched = engine.pool_mut().named(point, &[]);
    let checked = check(&mut engine, &p, root, PatternMode::Matching, matched);
    let subject = Value::object(matched, vec![(x, Value::Int(-1)), (y, Value::Int(2))]);
    let mut host = world.recording();

    let result = engine
        .match_pattern(&p.arena, &checked, &subject, &mut host)
        .unwrap();
    assert!(!result.is_matched());
    assert_eq!(host.getter_calls(y), 0);
}

proptest! {
    #[test]
    fn relational_logic_agrees_with_integers(
        value in -100i64..100,
        low in -100i64..100,
        high in -100i64..100,
    ) {
        let world = World::new();
        let mut engine = world.engine();
        let mut p = Patterns::new();
        let (lo, hi) = (p.int(low), p.int(high));
        let below = p.arena.relational(RelationalOp::Lt, lo);
        let above = p.arena.relational(RelationalOp::Gt, hi);
        let outside = p.arena.or(below, above);
        let (lo, hi) = (p.int(low), p.int(high));
        let from = p.arena.relational(RelationalOp::GtEq, lo);
        let to = p.arena.relational(RelationalOp::LtEq, hi);
        let inside = p.arena.and(from, to);
        let outside = check(&mut engine, &p, outside, PatternMode::Matching, Idx::INT);
        let inside = check(&mut engine, &p, inside, PatternMode::Matching, Idx::INT);
        let mut host = world.host();
        let subject = Value::Int(value);

        let got_outside = engine
            .match_pattern(&p.arena, &outside, &subject, &mut host)
            .unwrap()
            .is_matched();
        let got_inside = engine
            .match_pattern(&p.arena, &inside, &subject, &mut host)
            .unwrap()
            .is_matched();
        prop_assert_eq!(got_outside, value < low || value > high);
        prop_assert_eq!(got_inside, low <= value && value <= high);
    }
}
