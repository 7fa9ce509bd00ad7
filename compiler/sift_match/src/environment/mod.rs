//! Variable scopes that matched patterns write into.
//!
//! A successful match only records values (see [`Bindings`]). Declaring
//! them, assigning them, or opening a case body's scope happens here once
//! the match as a whole has succeeded.

use rustc_hash::FxHashMap;
use sift_ir::{Name, StringLookup};
use sift_types::{SharedScope, VariableSet};
use tracing::{debug, trace};

use crate::errors::{immutable_binding, undefined_variable};
use crate::{Bindings, EvalError, EvalResult, Value};

/// Whether a variable binding can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// `var x` or an untyped declaration.
    Mutable,
    /// `final x`
    Immutable,
}

impl Mutability {
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }

    #[inline]
    pub fn from_final(is_final: bool) -> Self {
        if is_final {
            Mutability::Immutable
        } else {
            Mutability::Mutable
        }
    }
}

/// Why an assignment was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    Immutable,
    Undefined,
}

impl AssignError {
    fn into_eval<I: StringLookup + ?Sized>(self, name: Name, lookup: &I) -> EvalError {
        match self {
            AssignError::Immutable => immutable_binding(lookup.lookup(name)),
            AssignError::Undefined => undefined_variable(lookup.lookup(name)),
        }
    }
}

#[derive(Clone, Debug)]
struct Slot {
    value: Value,
    mutability: Mutability,
}

/// The variables of one block: a case body, a declaration's enclosing block,
/// or the global frame.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    slots: FxHashMap<Name, Slot>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn define(&mut self, name: Name, value: Value, mutability: Mutability) {
        self.slots.insert(name, Slot { value, mutability });
    }

    pub fn get(&self, name: Name) -> Option<&Value> {
        self.slots.get(&name).map(|slot| &slot.value)
    }

    pub fn contains(&self, name: Name) -> bool {
        self.slots.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Stack of scopes. The bottom one is global and is never popped.
///
/// Scopes opened for case bodies end with the switch that opened them, so
/// the stack owns them outright and name resolution walks it innermost
/// first.
#[derive(Clone, Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::new()],
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    fn innermost(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    fn resolve(&self, name: Name) -> Option<&Slot> {
        self.scopes.iter().rev().find_map(|scope| scope.slots.get(&name))
    }

    pub fn define(&mut self, name: Name, value: Value, mutability: Mutability) {
        self.innermost().define(name, value, mutability);
    }

    pub fn define_global(&mut self, name: Name, value: Value, mutability: Mutability) {
        self.scopes[0].define(name, value, mutability);
    }

    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.resolve(name).map(|slot| slot.value.clone())
    }

    /// Whether `assign(name, _)` would succeed, without assigning.
    pub fn check_assign(&self, name: Name) -> Result<(), AssignError> {
        match self.resolve(name) {
            None => Err(AssignError::Undefined),
            Some(slot) if !slot.mutability.is_mutable() => Err(AssignError::Immutable),
            Some(_) => Ok(()),
        }
    }

    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        self.check_assign(name)?;
        let slot = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.slots.get_mut(&name))
            .ok_or(AssignError::Undefined)?;
        slot.value = value;
        Ok(())
    }

    /// Declare the variables of a matched declaration pattern in the
    /// innermost scope. Finality comes from `variables`.
    pub fn declare(&mut self, variables: &VariableSet, bindings: &Bindings) {
        for binding in variables {
            let Some(value) = bindings.get(binding.name) else {
                continue;
            };
            trace!(name = ?binding.name, is_final = binding.is_final, "declare");
            self.define(
                binding.name,
                value.clone(),
                Mutability::from_final(binding.is_final),
            );
        }
    }

    /// Write the values of a matched assignment pattern.
    ///
    /// Every target is checked before the first write, so on error the
    /// environment is unchanged.
    pub fn commit_assignments<I: StringLookup + ?Sized>(
        &mut self,
        bindings: &Bindings,
        lookup: &I,
    ) -> EvalResult<()> {
        for name in bindings.names() {
            self.check_assign(name)
                .map_err(|e| e.into_eval(name, lookup))?;
        }
        for (name, value) in bindings.iter() {
            self.assign(name, value.clone())
                .map_err(|e| e.into_eval(name, lookup))?;
        }
        debug!(targets = bindings.len(), "assignment committed");
        Ok(())
    }

    /// Open the scope of a case body and declare the case's variables in it.
    pub fn enter_case_scope(&mut self, variables: &VariableSet, bindings: &Bindings) {
        self.push_scope();
        self.declare(variables, bindings);
    }

    /// Open the scope of a body shared by several cases.
    ///
    /// Only the variables every case binds identically are defined; the
    /// values come from whichever case matched.
    pub fn enter_shared_scope(&mut self, scope: &SharedScope, bindings: &Bindings) {
        self.enter_case_scope(&scope.shared(), bindings);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
