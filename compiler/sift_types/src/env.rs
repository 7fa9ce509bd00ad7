//! Names visible to a pattern: constants and existing variables.
//!
//! Matching-mode identifiers and constant references resolve to constants;
//! assignment-mode identifiers resolve to variables. Both live in one
//! scope chain so that "a variable where a constant is required" can be
//! told apart from "no such name".

#![expect(
    clippy::disallowed_types,
    reason = "Rc<PatternEnvInner> gives O(1) child scopes with Rc::make_mut copy-on-write, as TypeEnv does"
)]

use rustc_hash::FxHashMap;
use sift_ir::{ConstValue, Name};
use std::rc::Rc;

use crate::Idx;

/// A name's meaning in the environment.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum EnvEntry {
    /// A compile-time constant with its static type.
    Constant { value: ConstValue, ty: Idx },
    /// A variable declared outside the pattern.
    Variable { ty: Idx, is_final: bool },
}

#[derive(Clone, Debug)]
struct PatternEnvInner {
    entries: FxHashMap<Name, EnvEntry>,
    parent: Option<PatternEnv>,
}

/// Scope chain of constants and variables.
#[derive(Clone, Debug)]
pub struct PatternEnv(Rc<PatternEnvInner>);

impl PatternEnv {
    pub fn new() -> Self {
        PatternEnv(Rc::new(PatternEnvInner {
            entries: FxHashMap::default(),
            parent: None,
        }))
    }

    /// Create a child scope. Bindings in the child shadow the parent's.
    #[must_use]
    pub fn child(&self) -> Self {
        PatternEnv(Rc::new(PatternEnvInner {
            entries: FxHashMap::default(),
            parent: Some(self.clone()),
        }))
    }

    pub fn define_constant(&mut self, name: Name, value: ConstValue, ty: Idx) {
        Rc::make_mut(&mut self.0)
            .entries
            .insert(name, EnvEntry::Constant { value, ty });
    }

    pub fn define_variable(&mut self, name: Name, ty: Idx, is_final: bool) {
        Rc::make_mut(&mut self.0)
            .entries
            .insert(name, EnvEntry::Variable { ty, is_final });
    }

    /// Look up a name, searching parent scopes.
    pub fn lookup(&self, name: Name) -> Option<EnvEntry> {
        self.0
            .entries
            .get(&name)
            .copied()
            .or_else(|| self.0.parent.as_ref().and_then(|p| p.lookup(name)))
    }

    /// Count entries in the current scope only.
    pub fn local_count(&self) -> usize {
        self.0.entries.len()
    }
}

impl Default for PatternEnv {
    fn default() -> Self {
        Self::new()
    }
}
