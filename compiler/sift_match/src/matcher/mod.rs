//! The runtime match algorithm.
//!
//! [`Matcher::match_pattern`] decides whether a subject matches a type
//! checked pattern and collects the values its variables would receive.
//! Evaluation is strictly in source order and stops at the first
//! refutation or fatal error; since member accesses may have side effects
//! that order is observable.
//!
//! Variable values are only recorded here. Declaring or assigning them is
//! the caller's job once the whole match has succeeded (see
//! [`Environment`](crate::Environment)), which makes assignment patterns
//! all-or-nothing.

mod destructure;

use sift_ir::{
    IdentifierResolution, Name, PatternArena, PatternId, PatternKind, PatternMode, RelationalOp,
    StringLookup,
};
use sift_stack::ensure_sufficient_stack;
use sift_types::{Idx, Pool, TypeOracle, TypedPatterns};
use tracing::{debug, trace};

use crate::errors::{
    cast_failed, irrefutable_match_failed, non_bool_comparison, not_annotated, null_assert_failed,
};
use crate::{
    EvalResult, InvocationKeyCache, MatchConfig, MatchExecutor, MatchPlan, NodeAccess, NodePlan,
    PathId, Value,
};

/// Values recorded for the variables of a successful match, in the order
/// they were matched.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Bindings {
    values: Vec<(Name, Value)>,
}

impl Bindings {
    pub fn get(&self, name: Name) -> Option<&Value> {
        self.values
            .iter()
            .find_map(|(n, v)| (*n == name).then_some(v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, &Value)> + '_ {
        self.values.iter().map(|(n, v)| (*n, v))
    }

    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.values.iter().map(|(n, _)| *n)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Name, Value)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (Name, Value)>>(iter: T) -> Self {
        Bindings {
            values: iter.into_iter().collect(),
        }
    }
}

/// Outcome of one match attempt. Fatal errors are the `Err` side of the
/// surrounding `EvalResult`.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchResult {
    Matched(Bindings),
    Refuted,
}

impl MatchResult {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }

    pub fn into_bindings(self) -> Option<Bindings> {
        match self {
            MatchResult::Matched(bindings) => Some(bindings),
            MatchResult::Refuted => None,
        }
    }
}

/// Scratch state of one match attempt.
///
/// The cache outlives the individual patterns: the cases of one switch
/// share a context, so an access made while trying one case is not
/// repeated by the next.
#[derive(Default, Debug)]
pub struct MatchContext {
    cache: InvocationKeyCache,
    pending: Vec<(Name, Value)>,
}

impl MatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &InvocationKeyCache {
        &self.cache
    }
}

/// A type checked pattern forest, ready to be matched.
#[derive(Copy, Clone)]
pub struct MatchProgram<'p> {
    pub arena: &'p PatternArena,
    pub typed: &'p TypedPatterns,
    pub plan: &'p MatchPlan,
    pub mode: PatternMode,
}

/// Runtime matcher over one [`MatchProgram`].
pub struct Matcher<'a, O: TypeOracle + ?Sized, H: MatchExecutor + ?Sized> {
    pool: &'a mut Pool,
    oracle: &'a O,
    strings: &'a dyn StringLookup,
    program: MatchProgram<'a>,
    host: &'a mut H,
    config: MatchConfig,
}

impl<'a, O: TypeOracle + ?Sized, H: MatchExecutor + ?Sized> Matcher<'a, O, H> {
    pub fn new(
        pool: &'a mut Pool,
        oracle: &'a O,
        strings: &'a dyn StringLookup,
        program: MatchProgram<'a>,
        host: &'a mut H,
        config: MatchConfig,
    ) -> Self {
        Matcher {
            pool,
            oracle,
            strings,
            program,
            host,
            config,
        }
    }

    pub fn mode(&self) -> PatternMode {
        self.program.mode
    }

    /// Match `subject` against the tree rooted at `root`.
    ///
    /// In a declaration or assignment a refutation is fatal.
    #[tracing::instrument(level = "debug", skip_all, fields(root = root.raw()))]
    pub fn match_pattern(
        &mut self,
        root: PatternId,
        subject: &Value,
        ctx: &mut MatchContext,
    ) -> EvalResult<MatchResult> {
        ctx.pending.clear();
        if self.match_node(root, subject, ctx)? {
            let bindings = Bindings {
                values: std::mem::take(&mut ctx.pending),
            };
            debug!(bindings = bindings.len(), "matched");
            return Ok(MatchResult::Matched(bindings));
        }
        ctx.pending.clear();
        if self.program.mode.is_irrefutable() {
            let found = self.runtime_type_name(subject);
            return Err(irrefutable_match_failed(&found).with_span(self.program.arena.span(root)));
        }
        debug!("refuted");
        Ok(MatchResult::Refuted)
    }

    /// Name of the runtime type of `value`, for error messages.
    pub fn runtime_type_name(&mut self, value: &Value) -> String {
        let ty = value.runtime_type(self.pool);
        self.type_name(ty)
    }

    fn type_name(&self, ty: Idx) -> String {
        self.pool.format_type(ty, self.strings)
    }

    fn match_node(&mut self, id: PatternId, value: &Value, ctx: &mut MatchContext) -> EvalResult<bool> {
        let span = self.program.arena.span(id);
        ensure_sufficient_stack(|| self.match_inner(id, value, ctx)).map_err(|e| e.with_span(span))
    }

    fn match_inner(&mut self, id: PatternId, value: &Value, ctx: &mut MatchContext) -> EvalResult<bool> {
        let arena = self.program.arena;
        let typed = self.program.typed;
        let pattern = arena.get(id);
        if pattern.is_untyped_wildcard() {
            return Ok(true);
        }

        match &pattern.kind {
            PatternKind::LogicalOr { left, right } => {
                let mark = ctx.pending.len();
                if self.match_node(*left, value, ctx)? {
                    return Ok(true);
                }
                ctx.pending.truncate(mark);
                self.match_node(*right, value, ctx)
            }
            PatternKind::LogicalAnd { left, right } => {
                Ok(self.match_node(*left, value, ctx)? && self.match_node(*right, value, ctx)?)
            }
            PatternKind::Relational { op, .. } => self.match_relational(id, *op, value, ctx),
            PatternKind::Cast { pattern: inner, .. } => {
                let cast = typed
                    .matched_type(*inner)
                    .ok_or_else(|| not_annotated(id.raw()))?;
                let matched = typed.matched_type(id).unwrap_or(Idx::DYNAMIC);
                let known = self.config.may_elide() && self.oracle.is_subtype(self.pool, matched, cast);
                if !known {
                    let actual = value.runtime_type(self.pool);
                    if !self.oracle.is_subtype(self.pool, actual, cast) {
                        return Err(cast_failed(&self.type_name(actual), &self.type_name(cast)));
                    }
                }
                self.match_node(*inner, value, ctx)
            }
            PatternKind::NullCheck(inner) => {
                if value.is_null() {
                    return Ok(false);
                }
                self.match_node(*inner, value, ctx)
            }
            PatternKind::NullAssert(inner) => {
                if value.is_null() {
                    return Err(null_assert_failed());
                }
                self.match_node(*inner, value, ctx)
            }
            PatternKind::Constant(_) => self.match_constant(id, value, ctx),
            PatternKind::Variable { name, .. } => self.match_variable(id, *name, value, ctx),
            PatternKind::Identifier(name) => match typed.identifier(id) {
                Some(IdentifierResolution::Wildcard) => Ok(true),
                Some(IdentifierResolution::Constant) => self.match_constant(id, value, ctx),
                Some(IdentifierResolution::Declare | IdentifierResolution::Assign) => {
                    self.match_variable(id, *name, value, ctx)
                }
                None => Err(not_annotated(id.raw())),
            },
            PatternKind::Parenthesized(inner) => self.match_node(*inner, value, ctx),
            PatternKind::Rest(inner) => match inner {
                Some(inner) => self.match_node(*inner, value, ctx),
                None => Ok(true),
            },
            PatternKind::List { elements, .. } => self.match_list(id, *elements, value, ctx),
            PatternKind::Map { entries, .. } => self.match_map(id, entries, value, ctx),
            PatternKind::Record(fields) => self.match_record(id, fields, value, ctx),
            PatternKind::Object { fields, .. } => self.match_object(id, fields, value, ctx),
        }
    }

    /// Runtime type test against the node's required type.
    ///
    /// A failed test refutes, except where a `dynamic` value was implicitly
    /// cast, where it is fatal.
    fn type_test(&mut self, id: PatternId, value: &Value) -> EvalResult<bool> {
        let typed = self.program.typed;
        let required = typed
            .required_type(id)
            .ok_or_else(|| not_annotated(id.raw()))?;
        if self.config.may_elide() && typed.is_guaranteed(id) {
            trace!(pattern = id.raw(), "type test elided");
            return Ok(true);
        }
        let actual = value.runtime_type(self.pool);
        if self.oracle.is_subtype(self.pool, actual, required) {
            return Ok(true);
        }
        if typed.needs_implicit_cast(id) {
            return Err(cast_failed(&self.type_name(actual), &self.type_name(required)));
        }
        trace!(pattern = id.raw(), ?actual, ?required, "type test refuted");
        Ok(false)
    }

    fn match_variable(
        &mut self,
        id: PatternId,
        name: Name,
        value: &Value,
        ctx: &mut MatchContext,
    ) -> EvalResult<bool> {
        if !self.type_test(id, value)? {
            return Ok(false);
        }
        if !name.is_wildcard() {
            ctx.pending.push((name, value.clone()));
        }
        Ok(true)
    }

    fn compare_path(&self, id: PatternId) -> EvalResult<PathId> {
        match self.program.plan.node(id) {
            Some(NodePlan {
                access: NodeAccess::Compare(path),
                ..
            }) => Ok(*path),
            _ => Err(not_annotated(id.raw())),
        }
    }

    /// `constant == value`, through the cache.
    fn match_constant(&mut self, id: PatternId, value: &Value, ctx: &mut MatchContext) -> EvalResult<bool> {
        let constant = self
            .program
            .typed
            .constant(id)
            .ok_or_else(|| not_annotated(id.raw()))?;
        let path = self.compare_path(id)?;
        let constant = Value::from_const(constant, self.strings);
        let host = &mut *self.host;
        let equal = ctx
            .cache
            .get_or_compute(path, || host.equals(&constant, value).map(Value::Bool))?;
        Ok(matches!(equal, Value::Bool(true)))
    }

    fn match_relational(
        &mut self,
        id: PatternId,
        op: RelationalOp,
        value: &Value,
        ctx: &mut MatchContext,
    ) -> EvalResult<bool> {
        let typed = self.program.typed;
        let constant = typed.constant(id).ok_or_else(|| not_annotated(id.raw()))?;
        let operand = Value::from_const(constant, self.strings);

        if op.is_equality() {
            // `null` is only equal to `null`; the operator is not consulted.
            let equal = if value.is_null() || operand.is_null() {
                value.is_null() && operand.is_null()
            } else {
                let result = self.invoke_operator(id, RelationalOp::Eq, value, &operand, ctx)?;
                expect_bool(op, result)?
            };
            return Ok(equal == (op == RelationalOp::Eq));
        }
        if value.is_null() {
            return Ok(false);
        }
        let result = self.invoke_operator(id, op, value, &operand, ctx)?;
        expect_bool(op, result)
    }

    fn invoke_operator(
        &mut self,
        id: PatternId,
        op: RelationalOp,
        value: &Value,
        operand: &Value,
        ctx: &mut MatchContext,
    ) -> EvalResult {
        let path = self.compare_path(id)?;
        let typed = self.program.typed;
        let extension = typed.operator(id).and_then(|o| o.extension.as_ref());
        let host = &mut *self.host;
        ctx.cache
            .get_or_compute(path, || host.compare(value, op, extension, operand))
    }
}

fn expect_bool(op: RelationalOp, result: Value) -> EvalResult<bool> {
    match result {
        Value::Bool(b) => Ok(b),
        other => Err(non_bool_comparison(op, &other)),
    }
}

#[cfg(test)]
mod tests;
