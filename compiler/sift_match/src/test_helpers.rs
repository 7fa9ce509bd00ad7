//! Test helpers for matcher unit tests.
//!
//! `World` holds what hosts borrow (names and the type registry); a
//! `Fixture` borrows a world and owns the mutable state a pattern needs on
//! its way from construction to a match.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use sift_ir::{
    ConstArena, ConstId, ConstValue, Name, ParsedType, PatternArena, PatternId, PatternMode, Span,
    StringInterner,
};
use sift_types::{Idx, PatternEnv, Pool, Subject, TypeInferencer, TypeRegistry, TypedPatterns};

use crate::{
    BuiltinExecutor, EvalResult, MatchConfig, MatchContext, MatchExecutor, MatchPlan,
    MatchProgram, MatchResult, Matcher, RecordingHost, Value,
};

pub(crate) struct World {
    pub interner: StringInterner,
    pub registry: TypeRegistry,
}

impl World {
    pub fn new() -> Self {
        let interner = StringInterner::new();
        let registry = TypeRegistry::new(&interner);
        World { interner, registry }
    }

    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub fn ty(&self, s: &str) -> ParsedType {
        ParsedType::named(self.interner.intern(s))
    }

    pub fn host(&self) -> BuiltinExecutor<'_> {
        BuiltinExecutor::new(&self.registry, &self.interner)
    }

    pub fn recording_host(&self) -> RecordingHost<'_, BuiltinExecutor<'_>> {
        RecordingHost::new(self.host(), &self.interner)
    }
}

pub(crate) struct Fixture<'w> {
    pub world: &'w World,
    pub pool: Pool,
    pub arena: PatternArena,
    pub consts: ConstArena,
    pub env: PatternEnv,
    pub config: MatchConfig,
}

impl<'w> Fixture<'w> {
    pub fn new(world: &'w World) -> Self {
        Fixture {
            world,
            pool: Pool::new(),
            arena: PatternArena::new(),
            consts: ConstArena::new(),
            env: PatternEnv::new(),
            config: MatchConfig::default(),
        }
    }

    pub fn name(&self, s: &str) -> Name {
        self.world.name(s)
    }

    pub fn ty(&self, s: &str) -> ParsedType {
        self.world.ty(s)
    }

    pub fn int(&mut self, value: i64) -> ConstId {
        self.consts.value(ConstValue::Int(value), Span::DUMMY)
    }

    pub fn string(&mut self, value: &str) -> ConstId {
        let name = self.world.name(value);
        self.consts.value(ConstValue::Str(name), Span::DUMMY)
    }

    pub fn null(&mut self) -> ConstId {
        self.consts.value(ConstValue::Null, Span::DUMMY)
    }

    /// Type check every root against `matched`, sharing one side table.
    pub fn typecheck(&mut self, roots: &[PatternId], mode: PatternMode, matched: Idx) -> TypedPatterns {
        let mut typed = TypedPatterns::new();
        for &root in roots {
            let mut inferencer = TypeInferencer::new(
                &mut self.pool,
                &self.world.registry,
                &self.arena,
                &self.consts,
                &self.env,
                mode,
            )
            .with_typed(typed);
            inferencer.infer(root, Subject::Typed(matched));
            let (next, errors) = inferencer.into_parts();
            let errors: Vec<_> = errors.into_iter().filter(|e| !e.is_warning()).collect();
            assert!(errors.is_empty(), "unexpected type errors: {errors:?}");
            typed = next;
        }
        typed
    }

    /// Type check and match one pattern with the given host.
    pub fn run_with<H: MatchExecutor + ?Sized>(
        &mut self,
        root: PatternId,
        mode: PatternMode,
        matched: Idx,
        subject: &Value,
        host: &mut H,
    ) -> EvalResult<MatchResult> {
        let typed = self.typecheck(&[root], mode, matched);
        let plan = MatchPlan::build(&self.arena, &typed, &[root]);
        let program = MatchProgram {
            arena: &self.arena,
            typed: &typed,
            plan: &plan,
            mode,
        };
        let mut matcher = Matcher::new(
            &mut self.pool,
            &self.world.registry,
            &self.world.interner,
            program,
            host,
            self.config,
        );
        let mut ctx = MatchContext::new();
        matcher.match_pattern(root, subject, &mut ctx)
    }

    /// Type check and match one pattern in matching mode.
    pub fn run(&mut self, root: PatternId, matched: Idx, subject: &Value) -> EvalResult<MatchResult> {
        let world = self.world;
        let mut host = world.host();
        self.run_with(root, PatternMode::Matching, matched, subject, &mut host)
    }
}

/// Bindings of a successful match as `(name, value)` pairs, or `None`.
pub(crate) fn bound(result: EvalResult<MatchResult>) -> Option<Vec<(Name, Value)>> {
    match result.unwrap() {
        MatchResult::Matched(bindings) => Some(
            bindings
                .iter()
                .map(|(name, value)| (name, value.clone()))
                .collect(),
        ),
        MatchResult::Refuted => None,
    }
}
