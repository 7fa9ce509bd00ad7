//! Host for built-in values, user objects and registered natives.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use sift_ir::{Name, RelationalOp, StringLookup};
use sift_types::{ExtensionId, ExtensionRef, GetterRef, TypeRegistry};

use super::MatchExecutor;
use crate::errors::{host_error, member_not_found};
use crate::{EvalResult, Value};

/// Host implementation of a getter.
pub type NativeGetter = fn(&Value) -> EvalResult;

/// Host implementation of a relational operator: `(receiver, operand)`.
pub type NativeOperator = fn(&Value, &Value) -> EvalResult;

/// [`MatchExecutor`] for the values in [`Value`].
///
/// Getters resolve, in order, to an extension native, an object field of
/// the same name, an enum's `index`/`name`, a built-in member of the
/// primitive and collection types, and finally a class native.
pub struct BuiltinExecutor<'r> {
    registry: &'r TypeRegistry,
    strings: &'r dyn StringLookup,
    getters: FxHashMap<(Option<ExtensionId>, Name), NativeGetter>,
    operators: FxHashMap<(Option<ExtensionId>, RelationalOp), NativeOperator>,
}

impl<'r> BuiltinExecutor<'r> {
    pub fn new(registry: &'r TypeRegistry, strings: &'r dyn StringLookup) -> Self {
        BuiltinExecutor {
            registry,
            strings,
            getters: FxHashMap::default(),
            operators: FxHashMap::default(),
        }
    }

    /// Register a class getter computed by the host.
    #[must_use]
    pub fn with_getter(mut self, name: Name, getter: NativeGetter) -> Self {
        self.getters.insert((None, name), getter);
        self
    }

    #[must_use]
    pub fn with_extension_getter(mut self, extension: ExtensionId, name: Name, getter: NativeGetter) -> Self {
        self.getters.insert((Some(extension), name), getter);
        self
    }

    /// Register a class operator. It applies to receivers without a
    /// built-in implementation.
    #[must_use]
    pub fn with_operator(mut self, op: RelationalOp, operator: NativeOperator) -> Self {
        self.operators.insert((None, op), operator);
        self
    }

    #[must_use]
    pub fn with_extension_operator(
        mut self,
        extension: ExtensionId,
        op: RelationalOp,
        operator: NativeOperator,
    ) -> Self {
        self.operators.insert((Some(extension), op), operator);
        self
    }

    fn builtin_getter(&self, receiver: &Value, name: &str) -> Option<EvalResult> {
        let value = match (receiver, name) {
            (Value::Str(s), "length") => Value::Int(i64::try_from(s.chars().count()).unwrap_or(i64::MAX)),
            (Value::Str(s), "isEmpty") => Value::Bool(s.is_empty()),
            (Value::Str(s), "isNotEmpty") => Value::Bool(!s.is_empty()),
            (Value::List(list), "length") => {
                Value::Int(i64::try_from(list.items.len()).unwrap_or(i64::MAX))
            }
            (Value::List(list), "isEmpty") => Value::Bool(list.items.is_empty()),
            (Value::List(list), "isNotEmpty") => Value::Bool(!list.items.is_empty()),
            (Value::List(list), "first") => {
                return Some(list.items.first().cloned().ok_or_else(|| host_error("no element")));
            }
            (Value::List(list), "last") => {
                return Some(list.items.last().cloned().ok_or_else(|| host_error("no element")));
            }
            (Value::Map(map), "length") => {
                Value::Int(i64::try_from(map.entries.len()).unwrap_or(i64::MAX))
            }
            (Value::Map(map), "isEmpty") => Value::Bool(map.entries.is_empty()),
            (Value::Map(map), "isNotEmpty") => Value::Bool(!map.entries.is_empty()),
            (Value::Int(i), "isEven") => Value::Bool(i % 2 == 0),
            (Value::Int(i), "isOdd") => Value::Bool(i % 2 != 0),
            (Value::Int(i), "isNegative") => Value::Bool(*i < 0),
            (Value::Int(i), "sign") => Value::Int(i.signum()),
            (Value::Double(d), "isNaN") => Value::Bool(d.is_nan()),
            (Value::Double(d), "isNegative") => Value::Bool(d.is_sign_negative() && *d != 0.0),
            (Value::Double(d), "sign") => Value::Double(if d.is_nan() || *d == 0.0 {
                *d
            } else {
                d.signum()
            }),
            _ => return None,
        };
        Some(Ok(value))
    }

    fn enum_getter(&self, ty: Name, variant: Name, name: &str) -> Option<Value> {
        match name {
            "index" => {
                let position = self
                    .registry
                    .enum_variants(ty)?
                    .iter()
                    .position(|&v| v == variant)?;
                Some(Value::Int(i64::try_from(position).unwrap_or(i64::MAX)))
            }
            "name" => Some(Value::string(self.strings.lookup(variant))),
            _ => None,
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "mixed int/double comparison follows double semantics"
)]
fn as_double(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Double(d) => Some(*d),
        _ => None,
    }
}

/// Ordering of two numbers; `None` if either is not a number or is NaN.
fn compare_numbers(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        _ => as_double(left)?.partial_cmp(&as_double(right)?),
    }
}

impl MatchExecutor for BuiltinExecutor<'_> {
    fn get(&mut self, receiver: &Value, getter: &GetterRef) -> EvalResult {
        let name = self.strings.lookup(getter.name);
        if let Some(extension) = &getter.extension {
            return match self.getters.get(&(Some(extension.id), getter.name)) {
                Some(native) => native(receiver),
                None => Err(member_not_found(name, receiver.kind_name())),
            };
        }
        match receiver {
            Value::Object(object) => {
                if let Some(field) = object.field(getter.name) {
                    return Ok(field.clone());
                }
            }
            Value::Enum { ty, variant } => {
                if let Some(value) = self.enum_getter(*ty, *variant, name) {
                    return Ok(value);
                }
            }
            _ => {
                if let Some(result) = self.builtin_getter(receiver, name) {
                    return result;
                }
            }
        }
        match self.getters.get(&(None, getter.name)) {
            Some(native) => native(receiver),
            None => Err(member_not_found(name, receiver.kind_name())),
        }
    }

    fn compare(
        &mut self,
        receiver: &Value,
        op: RelationalOp,
        extension: Option<&ExtensionRef>,
        operand: &Value,
    ) -> EvalResult {
        if let Some(extension) = extension {
            return match self.operators.get(&(Some(extension.id), op)) {
                Some(native) => native(receiver, operand),
                None => Err(member_not_found(op.as_symbol(), receiver.kind_name())),
            };
        }
        if op.is_equality() {
            return Ok(Value::Bool(receiver == operand));
        }
        if matches!(receiver, Value::Int(_) | Value::Double(_)) {
            let Some(ordering) = compare_numbers(receiver, operand) else {
                // NaN compares false with everything.
                return Ok(Value::Bool(false));
            };
            let result = match op {
                RelationalOp::Lt => ordering.is_lt(),
                RelationalOp::LtEq => ordering.is_le(),
                RelationalOp::Gt => ordering.is_gt(),
                RelationalOp::GtEq => ordering.is_ge(),
                RelationalOp::Eq | RelationalOp::NotEq => ordering.is_eq(),
            };
            return Ok(Value::Bool(result));
        }
        match self.operators.get(&(None, op)) {
            Some(native) => native(receiver, operand),
            None => Err(member_not_found(op.as_symbol(), receiver.kind_name())),
        }
    }
}
