use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::errors::host_error;

fn path(raw: u32) -> PathId {
    PathId::from_raw(raw)
}

#[test]
fn computes_once_per_path() {
    let mut cache = InvocationKeyCache::new();
    let mut calls = 0;
    for _ in 0..3 {
        let value = cache
            .get_or_compute(path(0), || {
                calls += 1;
                Ok(Value::Int(7))
            })
            .unwrap();
        assert_eq!(value, Value::Int(7));
    }
    assert_eq!(calls, 1);
    assert_eq!((cache.hits(), cache.misses()), (2, 1));
}

#[test]
fn errors_are_not_cached() {
    let mut cache = InvocationKeyCache::new();
    let first = cache.get_or_compute(path(0), || Err(host_error("boom")));
    assert!(first.is_err());
    assert!(cache.is_empty());

    let second = cache.get_or_compute(path(0), || Ok(Value::Bool(true)));
    assert_eq!(second.unwrap(), Value::Bool(true));
    assert_eq!(cache.misses(), 2);
}

#[test]
fn paths_are_cached_independently() {
    let mut cache = InvocationKeyCache::new();
    cache.get_or_compute(path(1), || Ok(Value::Int(1))).unwrap();
    cache.get_or_compute(path(2), || Ok(Value::Int(2))).unwrap();
    assert_eq!(cache.get(path(1)), Some(&Value::Int(1)));
    assert_eq!(cache.get(path(2)), Some(&Value::Int(2)));
    assert_eq!(cache.len(), 2);
}

proptest! {
    #[test]
    fn each_distinct_path_is_computed_once(accesses in prop::collection::vec(0u32..8, 0..40)) {
        let mut cache = InvocationKeyCache::new();
        let mut computed = Vec::new();
        for &raw in &accesses {
            let value = cache
                .get_or_compute(path(raw), || {
                    computed.push(raw);
                    Ok(Value::Int(i64::from(raw)))
                })
                .unwrap();
            prop_assert_eq!(value, Value::Int(i64::from(raw)));
        }

        let mut distinct = accesses.clone();
        distinct.sort_unstable();
        distinct.dedup();
        computed.sort_unstable();
        prop_assert_eq!(computed, distinct);
        prop_assert_eq!(cache.hits() + cache.misses(), accesses.len());
    }
}
