//! Pattern shapes for exhaustiveness checking.
//!
//! After type checking, each case's tree is lowered to a [`PatternShape`]:
//! the structure an exhaustiveness checker needs with everything else
//! (binding names, spans, written annotations) dropped. Shapes of all cases
//! plus the matched type go to an [`ExhaustivenessOracle`]; [`check_cases`]
//! turns its verdict into diagnostics.
//!
//! The full analysis is the oracle's business. [`CatchAllOracle`] is a
//! conservative stand-in that recognizes catch-all cases and `bool`
//! constants only.

use rustc_hash::FxHashSet;
use sift_ir::{
    ConstValue, IdentifierResolution, Name, PatternArena, PatternId, PatternKind, RelationalOp,
    Span,
};
use sift_stack::ensure_sufficient_stack;
use tracing::debug;

use crate::{Idx, Pool, TypeCheckError, TypeErrorKind, TypeOracle, TypedPatterns};

/// What a pattern tests, structurally.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum PatternShape {
    /// Matches every value of the matched type.
    Any,
    /// A node that failed type checking; assumed to cover nothing.
    Opaque,
    /// Succeeds for instances of the type.
    TypeTest(Idx),
    Constant(ConstValue),
    Relational { op: RelationalOp, value: ConstValue },
    NonNull(Box<PatternShape>),
    Or(Box<PatternShape>, Box<PatternShape>),
    And(Box<PatternShape>, Box<PatternShape>),
    /// `head` elements, then an optional rest, then `tail` elements.
    List {
        ty: Idx,
        head: Vec<SubShape>,
        rest: Option<Box<SubShape>>,
        tail: Vec<SubShape>,
    },
    Map {
        ty: Idx,
        entries: Vec<(ConstValue, SubShape)>,
    },
    Record {
        ty: Idx,
        fields: Vec<(Option<Name>, SubShape)>,
    },
    Object {
        ty: Idx,
        fields: Vec<(Name, SubShape)>,
    },
}

/// A nested shape with the static type of the value it sees.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct SubShape {
    pub matched: Idx,
    pub shape: PatternShape,
}

/// Lower the annotated tree rooted at `id`.
pub fn lower_shape(arena: &PatternArena, typed: &TypedPatterns, id: PatternId) -> PatternShape {
    ensure_sufficient_stack(|| lower_inner(arena, typed, id))
}

fn lower_inner(arena: &PatternArena, typed: &TypedPatterns, id: PatternId) -> PatternShape {
    let sub = |child: PatternId| SubShape {
        matched: typed.matched_type(child).unwrap_or(Idx::ERROR),
        shape: lower_shape(arena, typed, child),
    };
    let required = typed.required_type(id).unwrap_or(Idx::ERROR);

    match arena.kind(id) {
        PatternKind::LogicalOr { left, right } => PatternShape::Or(
            Box::new(lower_shape(arena, typed, *left)),
            Box::new(lower_shape(arena, typed, *right)),
        ),
        PatternKind::LogicalAnd { left, right } => PatternShape::And(
            Box::new(lower_shape(arena, typed, *left)),
            Box::new(lower_shape(arena, typed, *right)),
        ),
        PatternKind::Relational { op, .. } => match typed.constant(id) {
            Some(value) => PatternShape::Relational { op: *op, value },
            None => PatternShape::Opaque,
        },
        PatternKind::Constant(_) => typed
            .constant(id)
            .map_or(PatternShape::Opaque, PatternShape::Constant),
        PatternKind::Variable { ty: None, .. } => PatternShape::Any,
        PatternKind::Variable { ty: Some(_), .. } => {
            if typed.is_guaranteed(id) {
                PatternShape::Any
            } else {
                PatternShape::TypeTest(required)
            }
        }
        PatternKind::Identifier(_) => match typed.identifier(id) {
            Some(IdentifierResolution::Constant) => typed
                .constant(id)
                .map_or(PatternShape::Opaque, PatternShape::Constant),
            Some(_) => PatternShape::Any,
            None => PatternShape::Opaque,
        },
        PatternKind::Cast { pattern, .. }
        | PatternKind::NullAssert(pattern)
        | PatternKind::Parenthesized(pattern) => lower_shape(arena, typed, *pattern),
        PatternKind::NullCheck(pattern) => {
            PatternShape::NonNull(Box::new(lower_shape(arena, typed, *pattern)))
        }
        PatternKind::Rest(Some(pattern)) => lower_shape(arena, typed, *pattern),
        PatternKind::Rest(None) => PatternShape::Any,
        PatternKind::List { elements, .. } => {
            let mut head = Vec::new();
            let mut rest = None;
            let mut tail = Vec::new();
            for &element in arena.list(*elements) {
                if matches!(arena.kind(element), PatternKind::Rest(_)) && rest.is_none() {
                    rest = Some(Box::new(SubShape {
                        matched: typed.required_type(element).unwrap_or(Idx::ERROR),
                        shape: lower_shape(arena, typed, element),
                    }));
                } else if rest.is_some() {
                    tail.push(sub(element));
                } else {
                    head.push(sub(element));
                }
            }
            PatternShape::List {
                ty: required,
                head,
                rest,
                tail,
            }
        }
        PatternKind::Map { entries, .. } => match typed.map_keys(id) {
            Some(keys) if keys.len() == entries.len() => PatternShape::Map {
                ty: required,
                entries: keys
                    .iter()
                    .zip(entries)
                    .map(|(&key, entry)| (key, sub(entry.value)))
                    .collect(),
            },
            _ => PatternShape::Opaque,
        },
        PatternKind::Record(fields) => PatternShape::Record {
            ty: required,
            fields: fields.iter().map(|f| (f.name, sub(f.pattern))).collect(),
        },
        PatternKind::Object { fields, .. } => PatternShape::Object {
            ty: required,
            fields: fields.iter().map(|f| (f.name, sub(f.pattern))).collect(),
        },
    }
}

/// One case as seen by an exhaustiveness checker.
#[derive(Clone, Debug)]
pub struct CaseShape {
    pub shape: PatternShape,
    /// A guarded case covers nothing for exhaustiveness purposes.
    pub guarded: bool,
    pub span: Span,
}

/// Verdict for one switch.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ExhaustivenessVerdict {
    pub exhaustive: bool,
    /// One entry per case, in order.
    pub reachable: Vec<bool>,
}

/// External exhaustiveness and reachability analysis.
pub trait ExhaustivenessOracle {
    fn check(&self, pool: &mut Pool, matched: Idx, cases: &[CaseShape]) -> ExhaustivenessVerdict;
}

/// Feed the cases of one switch to `oracle` and report its verdict.
///
/// Unreachable cases are warnings. Non-exhaustiveness is an error only when
/// the switch must be exhaustive (a switch expression, or a statement over
/// an exhaustive type).
#[tracing::instrument(level = "debug", skip(oracle, pool, cases), fields(cases = cases.len()))]
pub fn check_cases<E: ExhaustivenessOracle + ?Sized>(
    oracle: &E,
    pool: &mut Pool,
    matched: Idx,
    cases: &[CaseShape],
    switch_span: Span,
    require_exhaustive: bool,
) -> Vec<TypeCheckError> {
    let verdict = oracle.check(pool, matched, cases);
    debug!(exhaustive = verdict.exhaustive, "exhaustiveness verdict");

    let mut errors = Vec::new();
    for (case, (shape, &reachable)) in cases.iter().zip(&verdict.reachable).enumerate() {
        if !reachable {
            errors.push(TypeCheckError::new(
                shape.span,
                TypeErrorKind::UnreachableCase { case },
            ));
        }
    }
    if require_exhaustive && !verdict.exhaustive {
        errors.push(TypeCheckError::new(
            switch_span,
            TypeErrorKind::NonExhaustive { matched },
        ));
    }
    errors
}

/// Conservative oracle: a switch is exhaustive if an unguarded case
/// matches every value of the matched type, or if unguarded `true`, `false`
/// (and `null`, when nullable) constants cover a `bool`.
///
/// A case is unreachable when an earlier unguarded case already covers
/// everything, or when it is a constant seen in an earlier unguarded case.
pub struct CatchAllOracle<'o, O: TypeOracle + ?Sized> {
    types: &'o O,
}

impl<'o, O: TypeOracle + ?Sized> CatchAllOracle<'o, O> {
    pub fn new(types: &'o O) -> Self {
        CatchAllOracle { types }
    }

    /// Whether `shape` matches every value of static type `matched`.
    pub fn covers(&self, pool: &mut Pool, shape: &PatternShape, matched: Idx) -> bool {
        ensure_sufficient_stack(|| self.covers_inner(pool, shape, matched))
    }

    fn covers_inner(&self, pool: &mut Pool, shape: &PatternShape, matched: Idx) -> bool {
        match shape {
            PatternShape::Any => true,
            PatternShape::Opaque | PatternShape::Constant(_) | PatternShape::Relational { .. } => {
                false
            }
            PatternShape::TypeTest(ty) => self.types.is_subtype(pool, matched, *ty),
            PatternShape::NonNull(inner) => {
                !pool.is_nullable(matched) && self.covers(pool, inner, matched)
            }
            PatternShape::Or(left, right) => {
                self.covers(pool, left, matched) || self.covers(pool, right, matched)
            }
            PatternShape::And(left, right) => {
                self.covers(pool, left, matched) && self.covers(pool, right, matched)
            }
            PatternShape::List {
                ty,
                head,
                rest,
                tail,
            } => match rest {
                Some(rest) if head.is_empty() && tail.is_empty() => {
                    self.types.is_subtype(pool, matched, *ty)
                        && self.covers(pool, &rest.shape, rest.matched)
                }
                _ => false,
            },
            PatternShape::Map { ty, entries } => {
                entries.is_empty() && self.types.is_subtype(pool, matched, *ty)
            }
            PatternShape::Record { ty, fields } => {
                self.types.is_subtype(pool, matched, *ty) && self.fields_cover(pool, fields)
            }
            PatternShape::Object { ty, fields } => {
                self.types.is_subtype(pool, matched, *ty) && self.fields_cover(pool, fields)
            }
        }
    }

    fn fields_cover<K>(&self, pool: &mut Pool, fields: &[(K, SubShape)]) -> bool {
        fields
            .iter()
            .all(|(_, field)| self.covers(pool, &field.shape, field.matched))
    }
}

/// Constants an unguarded case matches, looking through `||`.
fn collect_constants(shape: &PatternShape, out: &mut Vec<ConstValue>) {
    match shape {
        PatternShape::Constant(value) => out.push(*value),
        PatternShape::Or(left, right) => {
            collect_constants(left, out);
            collect_constants(right, out);
        }
        _ => {}
    }
}

impl<O: TypeOracle + ?Sized> ExhaustivenessOracle for CatchAllOracle<'_, O> {
    fn check(&self, pool: &mut Pool, matched: Idx, cases: &[CaseShape]) -> ExhaustivenessVerdict {
        let is_bool = pool.non_null(matched) == Idx::BOOL;
        let nullable = pool.is_nullable(matched);

        let mut covered = matched == Idx::NEVER;
        let mut seen: FxHashSet<ConstValue> = FxHashSet::default();
        let mut reachable = Vec::with_capacity(cases.len());
        for case in cases {
            let mut constants = Vec::new();
            collect_constants(&case.shape, &mut constants);
            let redundant = !constants.is_empty() && constants.iter().all(|c| seen.contains(c));
            reachable.push(!covered && !redundant);

            if case.guarded || covered {
                continue;
            }
            seen.extend(constants);
            covered = self.covers(pool, &case.shape, matched)
                || (is_bool
                    && seen.contains(&ConstValue::Bool(true))
                    && seen.contains(&ConstValue::Bool(false))
                    && (!nullable || seen.contains(&ConstValue::Null)));
        }
        ExhaustivenessVerdict {
            exhaustive: covered,
            reachable,
        }
    }
}
