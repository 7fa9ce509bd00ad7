//! List patterns match only lists whose length fits.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sift_ir::PatternMode;
use sift_match::Value;
use sift_types::Idx;

use crate::common::{bound, check, ints, Patterns, World};

#[test]
fn fixed_length_list_requires_exact_length() {
    let world = World::new();
    let mut engine = world.engine();
    let mut p = Patterns::new();
    let (a, b) = (world.name("a"), world.name("b"));
    let va = p.arena.var(a);
    let vb = p.arena.var(b);
    let root = p.arena.list_pattern(&[va, vb]);
    let matched = engine.pool_mut().list(Idx::INT);
    let checked = check(&mut engine, &p, root, PatternMode::Matching, matched);
    let mut host = world.host();

    let pair = engine
        .match_pattern(&p.arena, &checked, &ints(&[1, 2]), &mut host)
        .unwrap();
    assert_eq!(
        bound(pair),
        Some(vec![(a, Value::Int(1)), (b, Value::Int(2))])
    );

    let triple = engine
        .match_pattern(&p.arena, &checked, &ints(&[1, 2, 3]), &mut host)
        .unwrap();
    assert_eq!(bound(triple), None);
}

#[test]
fn rest_collects_the_middle() {
    let world = World::new();
    let mut engine = world.engine();
    let mut p = Patterns::new();
    let (first, mid, last) = (world.name("first"), world.name("mid"), world.name("last"));
    let vf = p.arena.var(first);
    let vm = p.arena.var(mid);
    let rest = p.arena.rest(Some(vm));
    let vl = p.arena.var(last);
    let root = p.arena.list_pattern(&[vf, rest, vl]);
    let matched = engine.pool_mut().list(Idx::INT);
    let checked = check(&mut engine, &p, root, PatternMode::Matching, matched);
    let mut host = world.recording();

    let result = engine
        .match_pattern(&p.arena, &checked, &ints(&[1, 2]), &mut host)
        .unwrap();
    assert_eq!(
        bound(result),
        Some(vec![
            (first, Value::Int(1)),
            (mid, ints(&[])),
            (last, Value::Int(2)),
        ])
    );
    assert!(host.log().contains(&"sublist(1, 1)".to_string()));
}

proptest! {
    #[test]
    fn head_and_rest_match_iff_long_enough(
        items in prop::collection::vec(-50i64..50, 0..8),
        heads in 0usize..4,
    ) {
        let world = World::new();
        let mut engine = world.engine();
        let mut p = Patterns::new();
        let names: Vec<_> = (0..heads).map(|i| world.name(&format!("h{i}"))).collect();
        let mut elements: Vec<_> = names.iter().map(|&n| p.arena.var(n)).collect();
        elements.push(p.arena.rest(None));
        let root = p.arena.list_pattern(&elements);
        let matched = engine.pool_mut().list(Idx::INT);
        let checked = check(&mut engine, &p, root, PatternMode::Matching, matched);
        let mut host = world.host();

        let result = engine
            .match_pattern(&p.arena, &checked, &ints(&items), &mut host)
            .unwrap();
        let expected = (items.len() >= heads).then(|| {
            names
                .iter()
                .zip(&items)
                .map(|(&n, &v)| (n, Value::Int(v)))
                .collect::<Vec<_>>()
        });
        prop_assert_eq!(bound(result), expected);
    }

    #[test]
    fn exact_list_matches_iff_same_length(
        items in prop::collection::vec(any::<i64>(), 0..6),
        len in 0usize..6,
    ) {
        let world = World::new();
        let mut engine = world.engine();
        let mut p = Patterns::new();
        let elements: Vec<_> = (0..len).map(|_| p.arena.wildcard()).collect();
        let root = p.arena.list_pattern(&elements);
        let matched = engine.pool_mut().list(Idx::INT);
        let checked = check(&mut engine, &p, root, PatternMode::Matching, matched);
        let mut host = world.host();

        let result = engine
            .match_pattern(&p.arena, &checked, &ints(&items), &mut host)
            .unwrap();
        prop_assert_eq!(result.is_matched(), items.len() == len);
    }
}
