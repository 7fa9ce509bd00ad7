//! Matcher configuration.

/// Switches that change how much runtime checking the matcher does.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MatchConfig {
    /// Skip a runtime type test when the static type already guarantees it.
    pub elide_type_tests: bool,
    /// Every value respects its static type, including its nullability.
    ///
    /// When `false`, values may come from unchecked code: type tests are
    /// never elided and a `null` map lookup always consults `containsKey`.
    pub sound_null_safety: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            elide_type_tests: true,
            sound_null_safety: true,
        }
    }
}

impl MatchConfig {
    #[must_use]
    pub fn with_elide_type_tests(mut self, elide: bool) -> Self {
        self.elide_type_tests = elide;
        self
    }

    #[must_use]
    pub fn with_sound_null_safety(mut self, sound: bool) -> Self {
        self.sound_null_safety = sound;
        self
    }

    /// Whether a statically guaranteed type test may be skipped.
    #[inline]
    pub fn may_elide(self) -> bool {
        self.elide_type_tests && self.sound_null_safety
    }
}
