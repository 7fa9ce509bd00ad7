//! Variables bound by a pattern.
//!
//! A pattern's [`VariableSet`] is computed from the typed tree:
//! - logical-or branches must bind *equal* sets
//! - every other composite kind takes the disjoint union of its children
//! - relational and constant patterns bind nothing
//! - variables and identifiers bind one name, except the wildcard `_`
//!
//! In an assignment pattern the "bindings" are the assignment targets.

mod shared;

pub use shared::{resolve_shared_scope, SharedBinding, SharedScope};

use rustc_hash::FxHashMap;
use sift_ir::{IdentifierResolution, Name, PatternArena, PatternId, PatternKind, PatternMode, Span};
use sift_stack::ensure_sufficient_stack;
use tracing::debug;

use crate::{Idx, TypeCheckError, TypeErrorKind, TypedPatterns};

/// A variable introduced (or assigned) by a pattern.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Binding {
    pub name: Name,
    /// Declared type, or the inferred type of an untyped variable.
    pub ty: Idx,
    pub is_final: bool,
    pub span: Span,
    /// The variable or identifier pattern that binds it.
    pub pattern: PatternId,
}

impl Binding {
    /// Same type and finality; spans and nodes may differ.
    pub fn same_signature(&self, other: &Binding) -> bool {
        self.ty == other.ty && self.is_final == other.is_final
    }
}

/// Bindings with unique names, in source order.
#[derive(Clone, Default, Debug)]
pub struct VariableSet {
    bindings: Vec<Binding>,
    index: FxHashMap<Name, usize>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding. Returns it back if the name is already bound.
    pub fn insert(&mut self, binding: Binding) -> Result<(), Binding> {
        if self.index.contains_key(&binding.name) {
            return Err(binding);
        }
        self.index.insert(binding.name, self.bindings.len());
        self.bindings.push(binding);
        Ok(())
    }

    pub fn get(&self, name: Name) -> Option<&Binding> {
        self.index.get(&name).map(|&i| &self.bindings[i])
    }

    pub fn contains(&self, name: Name) -> bool {
        self.index.contains_key(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.bindings.iter().map(|b| b.name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Same names with the same types and finality, in any order.
    pub fn same_bindings(&self, other: &VariableSet) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|b| other.get(b.name).is_some_and(|o| b.same_signature(o)))
    }
}

impl<'a> IntoIterator for &'a VariableSet {
    type Item = &'a Binding;
    type IntoIter = std::slice::Iter<'a, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}

/// Compute the variables bound by the tree rooted at `root`.
///
/// `typed` must hold the results of type checking the same tree.
#[tracing::instrument(level = "debug", skip(arena, typed))]
pub fn resolve_variables(
    arena: &PatternArena,
    typed: &TypedPatterns,
    mode: PatternMode,
    root: PatternId,
) -> (VariableSet, Vec<TypeCheckError>) {
    let mut resolver = Resolver {
        arena,
        typed,
        mode,
        errors: Vec::new(),
    };
    let set = resolver.collect(root);
    debug!(bindings = set.len(), errors = resolver.errors.len(), "variables resolved");
    (set, resolver.errors)
}

struct Resolver<'a> {
    arena: &'a PatternArena,
    typed: &'a TypedPatterns,
    mode: PatternMode,
    errors: Vec<TypeCheckError>,
}

impl Resolver<'_> {
    fn collect(&mut self, id: PatternId) -> VariableSet {
        ensure_sufficient_stack(|| self.collect_inner(id))
    }

    fn collect_inner(&mut self, id: PatternId) -> VariableSet {
        let arena = self.arena;
        let pattern = arena.get(id);
        match &pattern.kind {
            PatternKind::LogicalOr { left, right } => {
                let left = self.collect(*left);
                let right = self.collect(*right);
                self.reconcile_or(pattern.span, &left, &right);
                left
            }
            PatternKind::Relational { .. } | PatternKind::Constant(_) => VariableSet::new(),
            PatternKind::Variable { name, is_final, .. } => {
                self.single(id, *name, *is_final || self.declares_final())
            }
            PatternKind::Identifier(name) => match self.typed.identifier(id) {
                Some(IdentifierResolution::Declare) => self.single(id, *name, self.declares_final()),
                Some(IdentifierResolution::Assign) => self.single(id, *name, false),
                Some(IdentifierResolution::Wildcard | IdentifierResolution::Constant) | None => {
                    VariableSet::new()
                }
            },
            _ => {
                let mut set = VariableSet::new();
                for child in arena.children(id) {
                    let child_set = self.collect(child);
                    self.union_into(&mut set, child_set);
                }
                set
            }
        }
    }

    fn declares_final(&self) -> bool {
        matches!(self.mode, PatternMode::Declaration { is_final: true })
    }

    fn single(&mut self, id: PatternId, name: Name, is_final: bool) -> VariableSet {
        let mut set = VariableSet::new();
        if name.is_wildcard() {
            return set;
        }
        let ty = self.typed.required_type(id).unwrap_or(Idx::ERROR);
        // A fresh set cannot collide.
        let _ = set.insert(Binding {
            name,
            ty,
            is_final,
            span: self.arena.span(id),
            pattern: id,
        });
        set
    }

    fn union_into(&mut self, set: &mut VariableSet, other: VariableSet) {
        for binding in other.bindings {
            if let Err(dup) = set.insert(binding) {
                let kind = if self.mode == PatternMode::Assignment {
                    TypeErrorKind::AssignedTwice { name: dup.name }
                } else {
                    TypeErrorKind::DuplicateBinding { name: dup.name }
                };
                self.errors.push(TypeCheckError::new(dup.span, kind));
            }
        }
    }

    /// Both branches must bind the same names with the same signatures.
    fn reconcile_or(&mut self, span: Span, left: &VariableSet, right: &VariableSet) {
        let mut inconsistent: Vec<Name> = left
            .iter()
            .filter(|b| !right.get(b.name).is_some_and(|r| b.same_signature(r)))
            .map(|b| b.name)
            .collect();
        inconsistent.extend(right.names().filter(|&n| !left.contains(n)));
        for name in inconsistent {
            self.errors.push(TypeCheckError::new(
                span,
                TypeErrorKind::InconsistentOrBindings { name },
            ));
        }
    }
}
