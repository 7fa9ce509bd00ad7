//! Collects the diagnostics of one check before they are handed back.
//!
//! A single bad subpattern tends to report twice: once where it goes wrong
//! and again wherever its `<error>` type flows. The queue keeps the first,
//! caps how many errors survive, and returns them in source order.

use sift_ir::Span;

use crate::Diagnostic;

/// Rendering of the type given to subpatterns that already failed to check.
const ERROR_TYPE: &str = "<error>";

/// Why [`DiagnosticQueue::add`] dropped a diagnostic.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Rejection {
    OverLimit,
    FollowOn,
    Duplicate,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Errors kept per check; 0 keeps all. Warnings are never capped.
    pub error_limit: usize,
    /// Drop errors whose message mentions the `<error>` type.
    pub filter_follow_on: bool,
    /// Drop a diagnostic with the same code and primary span as a kept one.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 20,
            filter_follow_on: true,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Keep everything.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            filter_follow_on: false,
            deduplicate: false,
        }
    }

    #[must_use]
    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.error_limit = limit;
        self
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticQueue {
    kept: Vec<Diagnostic>,
    errors: usize,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            kept: Vec::new(),
            errors: 0,
            config,
        }
    }

    /// Returns whether `diag` was kept.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if let Some(reason) = self.rejects(&diag) {
            tracing::trace!(code = %diag.code, ?reason, "diagnostic dropped");
            return false;
        }
        if diag.is_error() {
            self.errors += 1;
        }
        self.kept.push(diag);
        true
    }

    fn rejects(&self, diag: &Diagnostic) -> Option<Rejection> {
        let config = &self.config;
        if diag.is_error() {
            if config.error_limit != 0 && self.errors >= config.error_limit {
                return Some(Rejection::OverLimit);
            }
            if config.filter_follow_on && diag.message.contains(ERROR_TYPE) {
                return Some(Rejection::FollowOn);
            }
        }
        let span = diag.primary_span();
        let seen = |d: &Diagnostic| d.code == diag.code && d.primary_span() == span;
        (config.deduplicate && self.kept.iter().any(seen)).then_some(Rejection::Duplicate)
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn len(&self) -> usize {
        self.kept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    /// Drain the queue in source order. Spanless diagnostics come last and
    /// equal spans keep the order they were added in.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut out = std::mem::take(&mut self.kept);
        out.sort_by_key(|d| match d.primary_span() {
            Some(Span { start, end }) => (false, start, end),
            None => (true, 0, 0),
        });
        self.errors = 0;
        out
    }
}
