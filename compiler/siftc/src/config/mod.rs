//! Engine configuration.

use sift_diagnostic::DiagnosticConfig;
use sift_match::MatchConfig;

/// Settings for one [`PatternEngine`](crate::PatternEngine).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub matching: MatchConfig,
    pub diagnostics: DiagnosticConfig,
}

impl EngineConfig {
    /// Unlimited, unfiltered diagnostics. Used by tests.
    pub fn unlimited() -> Self {
        EngineConfig {
            matching: MatchConfig::default(),
            diagnostics: DiagnosticConfig::unlimited(),
        }
    }

    #[must_use]
    pub fn with_elide_type_tests(mut self, elide: bool) -> Self {
        self.matching = self.matching.with_elide_type_tests(elide);
        self
    }

    #[must_use]
    pub fn with_sound_null_safety(mut self, sound: bool) -> Self {
        self.matching = self.matching.with_sound_null_safety(sound);
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[must_use]
    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.diagnostics = self.diagnostics.with_error_limit(limit);
        self
    }
}
