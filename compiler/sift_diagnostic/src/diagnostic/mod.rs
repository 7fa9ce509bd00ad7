//! The diagnostic record shared by the type checker and the matcher.

use std::fmt;

use sift_ir::Span;

use crate::ErrorCode;

/// How a diagnostic affects the construct it is reported on.
///
/// Severity is a property of the code: W-codes never stop a pattern from
/// being matched, every other code does.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    #[inline]
    pub fn of(code: ErrorCode) -> Self {
        if code.is_warning() {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message attached to a pattern's span.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    /// The pattern the diagnostic is about, as opposed to one that explains
    /// it (the other branch of `||`, an earlier case).
    pub is_primary: bool,
}

impl Label {
    pub fn at(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn context(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// An empty diagnostic for `code`; the severity follows from the code.
    #[cold]
    pub fn new(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: Severity::of(code),
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Point at the offending pattern.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::at(span, message));
        self
    }

    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::context(span, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    #[inline]
    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }

    /// Span of the first primary label. Diagnostics about a whole switch
    /// may have none.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find_map(|label| label.is_primary.then_some(label.span))
    }
}

/// One line for the headline, then one per label and note:
///
/// ```text
/// error[E3002]: variable `x` is not bound by both branches
///   --> 10..15: bound here only
///       20..25: other branch
///   = note: both sides of `||` must bind the same variables
/// ```
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {marker} {}: {}", label.span, label.message)?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
