//! Compile-time pattern errors and warnings.
//!
//! The inferencer and resolvers accumulate `TypeCheckError`s instead of
//! stopping at the first one. Each converts to a [`Diagnostic`] with a
//! stable error code; rendering names and types needs the pool and an
//! interner, so conversion happens at the edge.

use sift_diagnostic::{Diagnostic, ErrorCode};
use sift_ir::{ConstValue, Name, PatternId, RelationalOp, Span, StringLookup};

use crate::{AnnotationSlot, Idx, Pool};

/// A pattern error with its location.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TypeCheckError {
    pub span: Span,
    pub kind: TypeErrorKind,
}

/// What went wrong.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum TypeErrorKind {
    /// A refutable kind in a declaration or assignment.
    RefutableInIrrefutable { kind: &'static str },
    /// `name` is bound by one logical-or branch but not the other, or at a
    /// different type or finality.
    InconsistentOrBindings { name: Name },
    DuplicateBinding { name: Name },
    DuplicateRecordField { name: Name },
    DuplicateMapKey { key: ConstValue },
    MultipleRestElements,
    RestOutsideList,
    /// `name` is a variable where a constant is required.
    NonConstant { name: Name },
    UnresolvedConstant { name: Name },
    UnknownType { name: Name },
    WrongTypeArgCount {
        name: Name,
        expected: usize,
        found: usize,
    },
    UnknownGetter { receiver: Idx, name: Name },
    UndefinedOperator { receiver: Idx, op: RelationalOp },
    NonBoolOperator { op: RelationalOp, ret: Idx },
    NotAssignable { expected: Idx, found: Idx },
    AssignToFinal { name: Name },
    AssignToUndeclared { name: Name },
    AssignedTwice { name: Name },
    /// `var name` or `T name` inside an assignment pattern.
    DeclarationInAssignment { name: Name },
    /// `name` is not bound identically by every case sharing a body.
    UnusableSharedVariable { name: Name },
    NonExhaustive { matched: Idx },
    AnnotationConflict {
        pattern: PatternId,
        slot: AnnotationSlot,
    },
    NotAnnotated { pattern: PatternId },

    // === Warnings ===
    UnreachableCase { case: usize },
    ConstantNeverMatches { constant: Idx, matched: Idx },
}

impl TypeCheckError {
    pub fn new(span: Span, kind: TypeErrorKind) -> Self {
        TypeCheckError { span, kind }
    }

    pub fn code(&self) -> ErrorCode {
        match &self.kind {
            TypeErrorKind::RefutableInIrrefutable { .. } => ErrorCode::E3001,
            TypeErrorKind::InconsistentOrBindings { .. } => ErrorCode::E3002,
            TypeErrorKind::DuplicateBinding { .. } => ErrorCode::E3003,
            TypeErrorKind::DuplicateRecordField { .. } => ErrorCode::E3004,
            TypeErrorKind::DuplicateMapKey { .. } => ErrorCode::E3005,
            TypeErrorKind::MultipleRestElements => ErrorCode::E3006,
            TypeErrorKind::RestOutsideList => ErrorCode::E3007,
            TypeErrorKind::NonConstant { .. } => ErrorCode::E3008,
            TypeErrorKind::UnknownType { .. } => ErrorCode::E3009,
            TypeErrorKind::UnknownGetter { .. } => ErrorCode::E3010,
            TypeErrorKind::UndefinedOperator { .. } => ErrorCode::E3011,
            TypeErrorKind::NonBoolOperator { .. } => ErrorCode::E3012,
            TypeErrorKind::NotAssignable { .. } => ErrorCode::E3013,
            TypeErrorKind::AssignToFinal { .. } => ErrorCode::E3014,
            TypeErrorKind::AssignToUndeclared { .. } => ErrorCode::E3015,
            TypeErrorKind::AssignedTwice { .. } => ErrorCode::E3016,
            TypeErrorKind::UnusableSharedVariable { .. } => ErrorCode::E3017,
            TypeErrorKind::NonExhaustive { .. } => ErrorCode::E3018,
            TypeErrorKind::WrongTypeArgCount { .. } => ErrorCode::E3019,
            TypeErrorKind::UnresolvedConstant { .. } => ErrorCode::E3020,
            TypeErrorKind::DeclarationInAssignment { .. } => ErrorCode::E3021,
            TypeErrorKind::AnnotationConflict { .. } => ErrorCode::E9001,
            TypeErrorKind::NotAnnotated { .. } => ErrorCode::E9002,
            TypeErrorKind::UnreachableCase { .. } => ErrorCode::W3001,
            TypeErrorKind::ConstantNeverMatches { .. } => ErrorCode::W3002,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.code().is_warning()
    }

    /// One-line description.
    pub fn message<I: StringLookup>(&self, pool: &Pool, lookup: &I) -> String {
        let ty = |idx: Idx| pool.format_type(idx, lookup);
        let name = |n: Name| lookup.lookup(n).to_owned();
        match &self.kind {
            TypeErrorKind::RefutableInIrrefutable { kind } => {
                format!("a {kind} can fail to match and is not allowed here")
            }
            TypeErrorKind::InconsistentOrBindings { name: n } => format!(
                "variable `{}` must be bound in both branches with the same type and finality",
                name(*n)
            ),
            TypeErrorKind::DuplicateBinding { name: n } => {
                format!("variable `{}` is already bound in this pattern", name(*n))
            }
            TypeErrorKind::DuplicateRecordField { name: n } => {
                format!("field `{}` appears more than once", name(*n))
            }
            TypeErrorKind::DuplicateMapKey { key } => {
                format!("key {} appears more than once", key.display(lookup))
            }
            TypeErrorKind::MultipleRestElements => {
                "a list pattern can have at most one rest element".to_owned()
            }
            TypeErrorKind::RestOutsideList => {
                "rest elements are only allowed in list patterns".to_owned()
            }
            TypeErrorKind::NonConstant { name: n } => {
                format!("`{}` is a variable, not a constant", name(*n))
            }
            TypeErrorKind::UnresolvedConstant { name: n } => {
                format!("cannot find constant `{}`", name(*n))
            }
            TypeErrorKind::UnknownType { name: n } => format!("unknown type `{}`", name(*n)),
            TypeErrorKind::WrongTypeArgCount {
                name: n,
                expected,
                found,
            } => format!(
                "`{}` takes {expected} type argument{}, found {found}",
                name(*n),
                if *expected == 1 { "" } else { "s" }
            ),
            TypeErrorKind::UnknownGetter { receiver, name: n } => {
                format!("type `{}` has no getter `{}`", ty(*receiver), name(*n))
            }
            TypeErrorKind::UndefinedOperator { receiver, op } => {
                format!("operator `{op}` is not defined for `{}`", ty(*receiver))
            }
            TypeErrorKind::NonBoolOperator { op, ret } => {
                format!("operator `{op}` returns `{}`, not `bool`", ty(*ret))
            }
            TypeErrorKind::NotAssignable { expected, found } => format!(
                "a value of type `{}` cannot be matched against `{}`",
                ty(*found),
                ty(*expected)
            ),
            TypeErrorKind::AssignToFinal { name: n } => {
                format!("cannot assign to final variable `{}`", name(*n))
            }
            TypeErrorKind::AssignToUndeclared { name: n } => {
                format!("cannot assign to undeclared variable `{}`", name(*n))
            }
            TypeErrorKind::AssignedTwice { name: n } => {
                format!("variable `{}` is assigned more than once", name(*n))
            }
            TypeErrorKind::DeclarationInAssignment { name: n } => format!(
                "variable `{}` cannot be declared in an assignment pattern",
                name(*n)
            ),
            TypeErrorKind::UnusableSharedVariable { name: n } => format!(
                "variable `{}` is not available in a body shared by several cases",
                name(*n)
            ),
            TypeErrorKind::NonExhaustive { matched } => {
                format!("the cases do not cover every value of `{}`", ty(*matched))
            }
            TypeErrorKind::AnnotationConflict { pattern, slot } => format!(
                "{} of pattern #{} written twice",
                slot.as_str(),
                pattern.raw()
            ),
            TypeErrorKind::NotAnnotated { pattern } => {
                format!("pattern #{} was used before type checking", pattern.raw())
            }
            TypeErrorKind::UnreachableCase { case } => {
                format!("case {} can never be reached", case + 1)
            }
            TypeErrorKind::ConstantNeverMatches { constant, matched } => format!(
                "a constant of type `{}` can never match a value of type `{}`",
                ty(*constant),
                ty(*matched)
            ),
        }
    }

    fn label(&self) -> &'static str {
        match &self.kind {
            TypeErrorKind::RefutableInIrrefutable { .. } => "refutable pattern",
            TypeErrorKind::InconsistentOrBindings { .. } => "branches bind different variables",
            TypeErrorKind::DuplicateBinding { .. } | TypeErrorKind::AssignedTwice { .. } => {
                "bound again here"
            }
            TypeErrorKind::DuplicateRecordField { .. } | TypeErrorKind::DuplicateMapKey { .. } => {
                "duplicate"
            }
            TypeErrorKind::MultipleRestElements => "second rest element",
            TypeErrorKind::RestOutsideList => "not in a list pattern",
            TypeErrorKind::NonConstant { .. } => "not a constant",
            TypeErrorKind::UnresolvedConstant { .. } | TypeErrorKind::UnknownType { .. } => {
                "not found"
            }
            TypeErrorKind::WrongTypeArgCount { .. } => "wrong number of type arguments",
            TypeErrorKind::UnknownGetter { .. } => "no such getter",
            TypeErrorKind::UndefinedOperator { .. } => "operator not defined",
            TypeErrorKind::NonBoolOperator { .. } => "not a bool",
            TypeErrorKind::NotAssignable { .. } => "type mismatch",
            TypeErrorKind::AssignToFinal { .. } => "final variable",
            TypeErrorKind::AssignToUndeclared { .. } => "undeclared",
            TypeErrorKind::DeclarationInAssignment { .. } => "declaration",
            TypeErrorKind::UnusableSharedVariable { .. } => "not shared by every case",
            TypeErrorKind::NonExhaustive { .. } => "not exhaustive",
            TypeErrorKind::AnnotationConflict { .. } | TypeErrorKind::NotAnnotated { .. } => {
                "internal error"
            }
            TypeErrorKind::UnreachableCase { .. } => "unreachable",
            TypeErrorKind::ConstantNeverMatches { .. } => "never matches",
        }
    }

    /// Convert to a diagnostic for reporting.
    pub fn to_diagnostic<I: StringLookup>(&self, pool: &Pool, lookup: &I) -> Diagnostic {
        let diag = Diagnostic::new(self.code())
            .with_message(self.message(pool, lookup))
            .with_label(self.span, self.label());
        match &self.kind {
            TypeErrorKind::RefutableInIrrefutable { .. } => diag.with_note(
                "declarations and assignments must always match; use a switch or if-case",
            ),
            TypeErrorKind::NotAssignable { found, .. } if found.is_dynamic() => {
                diag.with_note("a `dynamic` value would be cast implicitly")
            }
            TypeErrorKind::DeclarationInAssignment { .. } => {
                diag.with_note("assign to an existing variable by writing its name alone")
            }
            TypeErrorKind::AnnotationConflict { .. } | TypeErrorKind::NotAnnotated { .. } => {
                diag.with_note("this is a bug in the pattern type checker")
            }
            _ => diag,
        }
    }
}

impl From<(Span, crate::AnnotationConflict)> for TypeCheckError {
    fn from((span, conflict): (Span, crate::AnnotationConflict)) -> Self {
        TypeCheckError::new(
            span,
            TypeErrorKind::AnnotationConflict {
                pattern: conflict.pattern,
                slot: conflict.slot,
            },
        )
    }
}
