//! Shared case scopes.
//!
//! When several cases fall into one body, a name is usable in the body only
//! if every case binds it with the same type and finality. Other names are
//! still in scope (they shadow outer variables) but referring to them is an
//! error. At run time the body's scope is a fresh table filled from the case
//! that matched.

use rustc_hash::FxHashMap;
use sift_ir::{Name, Span};
use tracing::debug;

use super::{Binding, VariableSet};
use crate::{TypeCheckError, TypeErrorKind};

/// A name in a shared case scope.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum SharedBinding {
    /// Bound identically by every case.
    Shared(Binding),
    /// Bound by some cases, or at different types.
    Unusable { name: Name },
}

impl SharedBinding {
    pub fn name(&self) -> Name {
        match self {
            SharedBinding::Shared(binding) => binding.name,
            SharedBinding::Unusable { name } => *name,
        }
    }
}

/// Scope of a body shared by several cases.
#[derive(Clone, Default, Debug)]
pub struct SharedScope {
    entries: Vec<SharedBinding>,
    index: FxHashMap<Name, usize>,
}

impl SharedScope {
    pub fn get(&self, name: Name) -> Option<&SharedBinding> {
        self.index.get(&name).map(|&i| &self.entries[i])
    }

    /// Resolve a reference to `name` from the body.
    ///
    /// `Ok(None)` means the scope does not declare the name, so lookup
    /// continues outward.
    pub fn lookup(&self, name: Name, span: Span) -> Result<Option<&Binding>, TypeCheckError> {
        match self.get(name) {
            Some(SharedBinding::Shared(binding)) => Ok(Some(binding)),
            Some(SharedBinding::Unusable { name }) => Err(TypeCheckError::new(
                span,
                TypeErrorKind::UnusableSharedVariable { name: *name },
            )),
            None => Ok(None),
        }
    }

    /// The usable bindings.
    pub fn shared(&self) -> VariableSet {
        let mut set = VariableSet::new();
        for entry in &self.entries {
            if let SharedBinding::Shared(binding) = entry {
                // Entry names are unique.
                let _ = set.insert(binding.clone());
            }
        }
        set
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedBinding> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the scope of a body reached by `cases`, one variable set per case.
#[tracing::instrument(level = "debug", skip_all, fields(cases = cases.len()))]
pub fn resolve_shared_scope(cases: &[VariableSet]) -> SharedScope {
    let mut scope = SharedScope::default();
    for set in cases {
        for binding in set {
            if scope.index.contains_key(&binding.name) {
                continue;
            }
            let shared = cases.iter().all(|other| {
                other
                    .get(binding.name)
                    .is_some_and(|o| o.same_signature(binding))
            });
            let entry = if shared {
                SharedBinding::Shared(binding.clone())
            } else {
                debug!(name = ?binding.name, "variable unusable in shared body");
                SharedBinding::Unusable { name: binding.name }
            };
            scope.index.insert(binding.name, scope.entries.len());
            scope.entries.push(entry);
        }
    }
    scope
}
