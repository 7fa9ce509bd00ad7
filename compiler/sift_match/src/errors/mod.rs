//! Fatal runtime errors raised while matching.
//!
//! A refutation is not an error: it is `MatchResult::Refuted`. Everything
//! here aborts the match attempt and propagates to the caller, whatever
//! the pattern context.
//!
//! Factory functions populate both `kind` and `message`; construct errors
//! through them rather than through the struct.

mod diagnostics;

use std::fmt;

use sift_ir::{RelationalOp, Span};

use crate::Value;

/// Result of a runtime operation that may fail fatally.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Typed error category for structured diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Pattern
    CastFailed {
        found: String,
        expected: String,
    },
    NullAssertFailed,
    NonBoolComparison {
        op: RelationalOp,
        found: String,
    },
    NonExhaustiveMatch {
        found: String,
    },
    IrrefutableMatchFailed {
        found: String,
    },

    // Access
    MemberNotFound {
        member: String,
        receiver: String,
    },

    // Deferred assignment
    UndefinedVariable {
        name: String,
    },
    ImmutableBinding {
        name: String,
    },

    // Internal
    NotAnnotated {
        pattern: u32,
    },

    /// Error raised by the host while invoking a member.
    Host {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CastFailed { found, expected } => {
                write!(f, "cast failed: `{found}` is not a subtype of `{expected}`")
            }
            Self::NullAssertFailed => write!(f, "null-assert pattern matched null"),
            Self::NonBoolComparison { op, found } => {
                write!(f, "operator `{op}` returned `{found}`, expected a bool")
            }
            Self::NonExhaustiveMatch { found } => {
                write!(f, "no case matched value of type `{found}`")
            }
            Self::IrrefutableMatchFailed { found } => {
                write!(f, "pattern did not match value of type `{found}`")
            }
            Self::MemberNotFound { member, receiver } => {
                write!(f, "no member `{member}` on `{receiver}`")
            }
            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),
            Self::ImmutableBinding { name } => {
                write!(f, "cannot assign to immutable variable: {name}")
            }
            Self::NotAnnotated { pattern } => {
                write!(f, "pattern {pattern} was matched before it was type checked")
            }
            Self::Host { message } => write!(f, "{message}"),
        }
    }
}

/// Secondary context attached to an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalNote {
    pub message: String,
    pub span: Option<Span>,
}

impl EvalNote {
    pub fn new(message: impl Into<String>) -> Self {
        EvalNote {
            message: message.into(),
            span: None,
        }
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

/// Fatal match error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    /// Structured category; decides the error code.
    pub kind: EvalErrorKind,
    /// Human-readable message, equal to `kind.to_string()` for factory-made errors.
    pub message: String,
    /// Pattern that raised the error.
    pub span: Option<Span>,
    pub notes: Vec<EvalNote>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            span: None,
            notes: Vec::new(),
        }
    }

    /// Attach the span of the failing pattern, keeping an existing one.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: EvalNote) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(span) = self.span {
            write!(f, " at {span}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

// Pattern Errors

/// A cast pattern's value is not of the cast type.
#[cold]
pub fn cast_failed(found: &str, expected: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CastFailed {
        found: found.to_string(),
        expected: expected.to_string(),
    })
}

#[cold]
pub fn null_assert_failed() -> EvalError {
    EvalError::from_kind(EvalErrorKind::NullAssertFailed)
}

/// A relational operator on a `dynamic` receiver returned a non-bool.
#[cold]
pub fn non_bool_comparison(op: RelationalOp, found: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NonBoolComparison {
        op,
        found: found.to_string(),
    })
}

/// No case of an exhaustive switch matched.
#[cold]
pub fn non_exhaustive_match(found: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NonExhaustiveMatch {
        found: found.to_string(),
    })
}

/// A declaration or assignment pattern refuted its value.
#[cold]
pub fn irrefutable_match_failed(found: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IrrefutableMatchFailed {
        found: found.to_string(),
    })
}

// Access Errors

#[cold]
pub fn member_not_found(member: &str, receiver: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MemberNotFound {
        member: member.to_string(),
        receiver: receiver.to_string(),
    })
}

/// An error thrown by host code during a member invocation.
#[cold]
pub fn host_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Host {
        message: message.into(),
    })
}

// Assignment Errors

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn immutable_binding(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ImmutableBinding {
        name: name.to_string(),
    })
}

// Internal Errors

#[cold]
pub fn not_annotated(pattern: u32) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotAnnotated { pattern })
}

#[cfg(test)]
mod tests;
