//! A map pattern requires each of its keys to be present.

use pretty_assertions::assert_eq;
use sift_ir::PatternMode;
use sift_match::Value;
use sift_types::Idx;
use siftc::EngineConfig;

use crate::common::{check, Patterns, World};

fn presence_checks(log: &[String]) -> usize {
    log.iter().filter(|entry| entry.starts_with("containsKey")).count()
}

#[test]
fn absent_key_refutes_without_presence_check() {
    let world = World::new();
    let mut engine = world.engine();
    let mut p = Patterns::new();
    let key = p.string(&world, "k");
    let skip = p.arena.wildcard();
    let root = p.arena.map(&[(key, skip)]);
    let matched = engine.pool_mut().map(Idx::STR, Idx::INT);
    let checked = check(&mut engine, &p, root, PatternMode::Matching, matched);
    let mut host = world.recording();

    let empty = Value::map(Idx::STR, Idx::INT, vec![]);
    let result = engine
        .match_pattern(&p.arena, &checked, &empty, &mut host)
        .unwrap();
    assert!(!result.is_matched());
    assert_eq!(presence_checks(host.log()), 0);

    let present = Value::map(
        Idx::STR,
        Idx::INT,
        vec![(Value::string("k"), Value::Int(5))],
    );
    let result = engine
        .match_pattern(&p.arena, &checked, &present, &mut host)
        .unwrap();
    assert!(result.is_matched());
}

#[test]
fn null_value_matches_only_when_key_is_present() {
    let world = World::new();
    let mut engine = world.engine();
    let mut p = Patterns::new();
    let key = p.string(&world, "k");
    let skip = p.arena.wildcard();
    let root = p.arena.map(&[(key, skip)]);
    let nullable = engine.pool_mut().nullable(Idx::INT);
    let matched = engine.pool_mut().map(Idx::STR, nullable);
    let checked = check(&mut engine, &p, root, PatternMode::Matching, matched);
    let mut host = world.recording();

    let stored_null = Value::map(Idx::STR, nullable, vec![(Value::string("k"), Value::Null)]);
    let result = engine
        .match_pattern(&p.arena, &checked, &stored_null, &mut host)
        .unwrap();
    assert!(result.is_matched());
    assert_eq!(presence_checks(host.log()), 1);

    let empty = Value::map(Idx::STR, nullable, vec![]);
    let result = engine
        .match_pattern(&p.arena, &checked, &empty, &mut host)
        .unwrap();
    assert!(!result.is_matched());
    assert_eq!(presence_checks(host.log()), 2);
}

#[test]
fn unsound_null_safety_always_checks_presence() {
    let world = World::new();
    let config = EngineConfig::unlimited().with_sound_null_safety(false);
    let mut engine = siftc::PatternEngine::new(&world.registry, &world.interner, config);
    let mut p = Patterns::new();
    let key = p.string(&world, "k");
    let skip = p.arena.wildcard();
    let root = p.arena.map(&[(key, skip)]);
    let matched = engine.pool_mut().map(Idx::STR, Idx::INT);
    let checked = check(&mut engine, &p, root, PatternMode::Matching, matched);
    let mut host = world.recording();

    let empty = Value::map(Idx::STR, Idx::INT, vec![]);
    let result = engine
        .match_pattern(&p.arena, &checked, &empty, &mut host)
        .unwrap();
    assert!(!result.is_matched());
    assert_eq!(presence_checks(host.log()), 1);
}
