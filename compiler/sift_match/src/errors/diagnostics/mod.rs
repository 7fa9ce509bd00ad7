//! Runtime error to diagnostic conversion.
//!
//! # Error Codes
//!
//! - E6001–E6005: pattern failures (cast, null-assert, comparison, no case)
//! - E6006: member lookup
//! - E6007: deferred assignment
//! - E6099: host errors
//! - E9002: matching an unchecked pattern

use sift_diagnostic::{Diagnostic, ErrorCode};

use super::{EvalError, EvalErrorKind};

impl EvalErrorKind {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::CastFailed { .. } => ErrorCode::E6001,
            Self::NullAssertFailed => ErrorCode::E6002,
            Self::NonBoolComparison { .. } => ErrorCode::E6003,
            Self::NonExhaustiveMatch { .. } => ErrorCode::E6004,
            Self::IrrefutableMatchFailed { .. } => ErrorCode::E6005,
            Self::MemberNotFound { .. } => ErrorCode::E6006,
            Self::UndefinedVariable { .. } | Self::ImmutableBinding { .. } => ErrorCode::E6007,
            Self::NotAnnotated { .. } => ErrorCode::E9002,
            Self::Host { .. } => ErrorCode::E6099,
        }
    }

    /// Concise label for the primary span.
    pub fn primary_label(&self) -> &'static str {
        match self {
            Self::CastFailed { .. } => "cast failed here",
            Self::NullAssertFailed => "value was null",
            Self::NonBoolComparison { .. } => "comparison did not return a bool",
            Self::NonExhaustiveMatch { .. } => "no case matched",
            Self::IrrefutableMatchFailed { .. } => "pattern did not match",
            Self::MemberNotFound { .. } => "member not found",
            Self::UndefinedVariable { .. } => "not found in this scope",
            Self::ImmutableBinding { .. } => "cannot assign to immutable binding",
            Self::NotAnnotated { .. } => "pattern not type checked",
            Self::Host { .. } => "raised while matching",
        }
    }
}

impl EvalError {
    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = self.kind.error_code();
        let mut diag = Diagnostic::new(code).with_message(&self.message);

        if let Some(span) = self.span {
            diag = diag.with_label(span, self.kind.primary_label());
        }
        for note in &self.notes {
            diag = match note.span {
                Some(span) => diag.with_secondary_label(span, &note.message),
                None => diag.with_note(&note.message),
            };
        }
        diag
    }
}
