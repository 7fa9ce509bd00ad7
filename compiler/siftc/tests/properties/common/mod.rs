//! Shared setup for the property tests.

#![allow(dead_code)]

use sift_ir::{
    ConstArena, ConstId, ConstValue, Name, ParsedType, PatternArena, PatternId, PatternMode, Span,
    StringInterner,
};
use sift_match::{BuiltinExecutor, MatchResult, RecordingHost, Value};
use sift_types::{ClassDef, Idx, PatternEnv, Subject, TypeRegistry};
use siftc::{CheckedPattern, EngineConfig, PatternEngine, PatternSource};

/// Names and the type registry; everything hosts and engines borrow.
pub struct World {
    pub interner: StringInterner,
    pub registry: TypeRegistry,
}

impl World {
    pub fn new() -> Self {
        let interner = StringInterner::new();
        let registry = TypeRegistry::new(&interner);
        World { interner, registry }
    }

    /// A world with `class Point { int x; int y; }`.
    pub fn with_point() -> Self {
        let mut world = World::new();
        let (point, x, y) = (world.name("Point"), world.name("x"), world.name("y"));
        let int = world.ty("int");
        world.registry.define_class(
            ClassDef::new(point)
                .with_getter(x, int.clone())
                .with_getter(y, int),
        );
        world
    }

    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub fn ty(&self, s: &str) -> ParsedType {
        ParsedType::named(self.interner.intern(s))
    }

    pub fn engine(&self) -> PatternEngine<'_> {
        PatternEngine::new(&self.registry, &self.interner, EngineConfig::unlimited())
    }

    pub fn host(&self) -> BuiltinExecutor<'_> {
        BuiltinExecutor::new(&self.registry, &self.interner)
    }

    pub fn recording(&self) -> RecordingHost<'_, BuiltinExecutor<'_>> {
        RecordingHost::new(self.host(), &self.interner)
    }
}

/// Pattern trees under construction.
pub struct Patterns {
    pub arena: PatternArena,
    pub consts: ConstArena,
    pub env: PatternEnv,
}

impl Patterns {
    pub fn new() -> Self {
        Patterns {
            arena: PatternArena::new(),
            consts: ConstArena::new(),
            env: PatternEnv::new(),
        }
    }

    pub fn source(&self) -> PatternSource<'_> {
        PatternSource {
            arena: &self.arena,
            consts: &self.consts,
            env: &self.env,
        }
    }

    pub fn int(&mut self, value: i64) -> ConstId {
        self.consts.value(ConstValue::Int(value), Span::DUMMY)
    }

    pub fn null(&mut self) -> ConstId {
        self.consts.value(ConstValue::Null, Span::DUMMY)
    }

    pub fn string(&mut self, world: &World, value: &str) -> ConstId {
        self.consts
            .value(ConstValue::Str(world.name(value)), Span::DUMMY)
    }
}

/// Type check `root` against a subject of static type `matched`, asserting
/// that no error is reported.
pub fn check(
    engine: &mut PatternEngine<'_>,
    patterns: &Patterns,
    root: PatternId,
    mode: PatternMode,
    matched: Idx,
) -> CheckedPattern {
    let (checked, diagnostics) =
        engine.type_check_pattern(patterns.source(), root, mode, Subject::Typed(matched));
    assert!(
        !checked.has_errors(),
        "unexpected diagnostics: {diagnostics:?}"
    );
    checked
}

pub fn ints(values: &[i64]) -> Value {
    Value::list(Idx::INT, values.iter().map(|&v| Value::Int(v)).collect())
}

/// Bindings of a match as `(name, value)` pairs, or `None` when refuted.
pub fn bound(result: MatchResult) -> Option<Vec<(Name, Value)>> {
    result.into_bindings().map(|bindings| {
        bindings
            .iter()
            .map(|(name, value)| (name, value.clone()))
            .collect()
    })
}
