//! The pattern engine.

use sift_diagnostic::{Diagnostic, DiagnosticQueue};
use sift_ir::{ConstArena, PatternArena, PatternId, PatternMode, Span, StringInterner};
use sift_match::{
    match_cases, Bindings, CaseMatch, Environment, EvalResult, MatchContext, MatchExecutor,
    MatchPlan, MatchProgram, MatchResult, Matcher, Value,
};
use sift_types::{
    check_cases, lower_shape, resolve_shared_scope, resolve_variables, CaseShape,
    ExhaustivenessOracle, Idx, PatternEnv, PatternTypes, Pool, SharedScope, Subject,
    TypeCheckError, TypeInferencer, TypeOracle, TypeRegistry, TypedPatterns, VariableSet,
};
use tracing::debug;

use crate::EngineConfig;

/// The trees a pattern is built from, and the names it can refer to.
#[derive(Copy, Clone)]
pub struct PatternSource<'s> {
    pub arena: &'s PatternArena,
    pub consts: &'s ConstArena,
    pub env: &'s PatternEnv,
}

/// A type checked pattern, ready to be matched.
#[derive(Clone, Debug)]
pub struct CheckedPattern {
    pub root: PatternId,
    pub mode: PatternMode,
    pub types: PatternTypes,
    pub typed: TypedPatterns,
    pub variables: VariableSet,
    pub plan: MatchPlan,
    has_errors: bool,
}

impl CheckedPattern {
    /// Whether checking reported an error. Matching such a pattern may
    /// fail with an internal error where annotations are missing.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }
}

/// One case of a switch.
#[derive(Copy, Clone, Debug)]
pub struct SwitchCase {
    pub pattern: PatternId,
    pub guarded: bool,
    pub span: Span,
}

/// The type checked cases of one switch over one subject.
#[derive(Clone, Debug)]
pub struct CheckedSwitch {
    pub cases: Vec<PatternId>,
    pub matched: Idx,
    pub typed: TypedPatterns,
    /// Variables of each case, in case order.
    pub variables: Vec<VariableSet>,
    pub plan: MatchPlan,
    /// The switch must be exhaustive; running off its end is fatal.
    pub exhaustive: bool,
    has_errors: bool,
}

impl CheckedSwitch {
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }
}

/// Type checks patterns and matches them against values.
///
/// The engine owns the type pool, so types named by its results are only
/// meaningful together with [`pool`](Self::pool).
pub struct PatternEngine<'e, O: TypeOracle + ?Sized = TypeRegistry> {
    oracle: &'e O,
    interner: &'e StringInterner,
    pool: Pool,
    config: EngineConfig,
}

impl<'e, O: TypeOracle + ?Sized> PatternEngine<'e, O> {
    pub fn new(oracle: &'e O, interner: &'e StringInterner, config: EngineConfig) -> Self {
        PatternEngine {
            oracle,
            interner,
            pool: Pool::new(),
            config,
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut Pool {
        &mut self.pool
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Display form of a type of this engine's pool.
    pub fn format_type(&self, ty: Idx) -> String {
        self.pool.format_type(ty, self.interner)
    }

    /// Annotate the pattern rooted at `root` in `mode`.
    ///
    /// `subject` is either the subject's known static type or a checker for
    /// the subject expression, which receives the pattern's context schema in
    /// a declaration or assignment.
    #[tracing::instrument(level = "debug", skip_all, fields(root = root.raw(), ?mode))]
    pub fn type_check_pattern(
        &mut self,
        source: PatternSource<'_>,
        root: PatternId,
        mode: PatternMode,
        subject: Subject<'_>,
    ) -> (CheckedPattern, Vec<Diagnostic>) {
        let mut inferencer = TypeInferencer::new(
            &mut self.pool,
            self.oracle,
            source.arena,
            source.consts,
            source.env,
            mode,
        );
        let types = inferencer.infer(root, subject);
        let (typed, mut errors) = inferencer.into_parts();
        let (variables, variable_errors) = resolve_variables(source.arena, &typed, mode, root);
        errors.extend(variable_errors);
        let plan = MatchPlan::build(source.arena, &typed, &[root]);

        let has_errors = errors.iter().any(|e| !e.is_warning());
        let diagnostics = self.diagnose(&errors);
        debug!(has_errors, diagnostics = diagnostics.len(), "pattern checked");
        let checked = CheckedPattern {
            root,
            mode,
            types,
            typed,
            variables,
            plan,
            has_errors,
        };
        (checked, diagnostics)
    }

    /// Annotate the cases of a switch whose subject has static type
    /// `matched`, and ask `exhaustiveness` about them.
    #[tracing::instrument(level = "debug", skip_all, fields(cases = cases.len()))]
    pub fn type_check_switch<E: ExhaustivenessOracle + ?Sized>(
        &mut self,
        source: PatternSource<'_>,
        cases: &[SwitchCase],
        matched: Idx,
        switch_span: Span,
        exhaustive: bool,
        exhaustiveness: &E,
    ) -> (CheckedSwitch, Vec<Diagnostic>) {
        let mut typed = TypedPatterns::new();
        let mut errors = Vec::new();
        for case in cases {
            let mut inferencer = TypeInferencer::new(
                &mut self.pool,
                self.oracle,
                source.arena,
                source.consts,
                source.env,
                PatternMode::Matching,
            )
            .with_typed(typed);
            inferencer.infer(case.pattern, Subject::Typed(matched));
            let (next, case_errors) = inferencer.into_parts();
            typed = next;
            errors.extend(case_errors);
        }

        let mut variables = Vec::with_capacity(cases.len());
        for case in cases {
            let (set, case_errors) =
                resolve_variables(source.arena, &typed, PatternMode::Matching, case.pattern);
            errors.extend(case_errors);
            variables.push(set);
        }

        let shapes: Vec<CaseShape> = cases
            .iter()
            .map(|case| CaseShape {
                shape: lower_shape(source.arena, &typed, case.pattern),
                guarded: case.guarded,
                span: case.span,
            })
            .collect();
        errors.extend(check_cases(
            exhaustiveness,
            &mut self.pool,
            matched,
            &shapes,
            switch_span,
            exhaustive,
        ));

        let roots: Vec<PatternId> = cases.iter().map(|case| case.pattern).collect();
        let plan = MatchPlan::build(source.arena, &typed, &roots);
        let has_errors = errors.iter().any(|e| !e.is_warning());
        let diagnostics = self.diagnose(&errors);
        debug!(has_errors, diagnostics = diagnostics.len(), "switch checked");
        let checked = CheckedSwitch {
            cases: roots,
            matched,
            typed,
            variables,
            plan,
            exhaustive,
            has_errors,
        };
        (checked, diagnostics)
    }

    /// Match `subject` against a checked pattern.
    ///
    /// Refutation is `Ok(MatchResult::Refuted)`; in a declaration or
    /// assignment it is a fatal error instead.
    pub fn match_pattern<H: MatchExecutor + ?Sized>(
        &mut self,
        arena: &PatternArena,
        checked: &CheckedPattern,
        subject: &Value,
        host: &mut H,
    ) -> EvalResult<MatchResult> {
        let program = MatchProgram {
            arena,
            typed: &checked.typed,
            plan: &checked.plan,
            mode: checked.mode,
        };
        let mut matcher = Matcher::new(
            &mut self.pool,
            self.oracle,
            self.interner,
            program,
            host,
            self.config.matching,
        );
        matcher.match_pattern(checked.root, subject, &mut MatchContext::new())
    }

    /// Run a checked switch: the first case that matches and whose guard
    /// accepts its bindings wins.
    pub fn match_switch<H, G>(
        &mut self,
        arena: &PatternArena,
        switch: &CheckedSwitch,
        subject: &Value,
        host: &mut H,
        guard: G,
    ) -> EvalResult<Option<CaseMatch>>
    where
        H: MatchExecutor + ?Sized,
        G: FnMut(usize, &Bindings) -> EvalResult<bool>,
    {
        let program = MatchProgram {
            arena,
            typed: &switch.typed,
            plan: &switch.plan,
            mode: PatternMode::Matching,
        };
        let mut matcher = Matcher::new(
            &mut self.pool,
            self.oracle,
            self.interner,
            program,
            host,
            self.config.matching,
        );
        match_cases(&mut matcher, subject, &switch.cases, guard, switch.exhaustive)
    }

    /// Scope of a body shared by the cases with the given variable sets.
    pub fn resolve_shared_scope(&self, cases: &[VariableSet]) -> SharedScope {
        resolve_shared_scope(cases)
    }

    /// Make the bindings of a successful match visible in `env`.
    ///
    /// A declaration defines its variables in the current scope and an
    /// assignment writes its targets all at once. A matching pattern opens a
    /// new scope for the case body, which the caller pops when the body ends.
    pub fn apply_bindings(
        &self,
        env: &mut Environment,
        checked: &CheckedPattern,
        bindings: &Bindings,
    ) -> EvalResult<()> {
        match checked.mode {
            PatternMode::Declaration { .. } => env.declare(&checked.variables, bindings),
            PatternMode::Assignment => env.commit_assignments(bindings, self.interner)?,
            PatternMode::Matching => env.enter_case_scope(&checked.variables, bindings),
        }
        Ok(())
    }

    fn diagnose(&self, errors: &[TypeCheckError]) -> Vec<Diagnostic> {
        let mut queue = DiagnosticQueue::with_config(self.config.diagnostics.clone());
        for err in errors {
            queue.add(err.to_diagnostic(&self.pool, self.interner));
        }
        queue.flush()
    }
}
