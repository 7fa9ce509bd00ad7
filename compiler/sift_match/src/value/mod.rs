//! Runtime values seen by the matcher.
//!
//! Heap parts go through [`Heap`], whose constructor is crate-private, so
//! every list, map, record and object is built by a `Value` factory method.
//!
//! Collections carry their reified type arguments (`List<int>` knows it
//! holds `int`s), which is what the runtime type tests of list and map
//! patterns check against.

mod heap;

use std::fmt;

use sift_ir::{ConstValue, Name, StringLookup};
use sift_types::{Idx, Pool};

pub use heap::Heap;

/// A list with its reified element type.
#[derive(Clone, PartialEq, Debug)]
pub struct ListValue {
    pub elem: Idx,
    pub items: Vec<Value>,
}

/// A map with its reified key and value types, in insertion order.
#[derive(Clone, PartialEq, Debug)]
pub struct MapValue {
    pub key: Idx,
    pub value: Idx,
    pub entries: Vec<(Value, Value)>,
}

impl MapValue {
    /// The value stored under `key`, or `None` if absent.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }
}

/// A record's positional and named fields.
#[derive(Clone, PartialEq, Debug)]
pub struct RecordValue {
    pub positional: Vec<Value>,
    pub named: Vec<(Name, Value)>,
}

impl RecordValue {
    pub fn named_field(&self, name: Name) -> Option<&Value> {
        self.named
            .iter()
            .find_map(|(n, v)| (*n == name).then_some(v))
    }
}

/// An instance of a user class. Fields back its getters.
#[derive(Clone, PartialEq, Debug)]
pub struct ObjectValue {
    pub ty: Idx,
    pub fields: Vec<(Name, Value)>,
}

impl ObjectValue {
    pub fn field(&self, name: Name) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(n, v)| (*n == name).then_some(v))
    }
}

/// Runtime value.
///
/// Equality is structural: `1 == 1.0`, two lists with equal items are
/// equal, and `NaN` equals nothing.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(Heap<str>),
    List(Heap<ListValue>),
    Map(Heap<MapValue>),
    Record(Heap<RecordValue>),
    Object(Heap<ObjectValue>),
    Enum { ty: Name, variant: Name },
}

// Factory Methods (ONLY way to construct heap values)

impl Value {
    #[inline]
    pub fn string(s: &str) -> Self {
        Value::Str(Heap::new_str(s))
    }

    /// `<elem>[items...]`
    #[inline]
    pub fn list(elem: Idx, items: Vec<Value>) -> Self {
        Value::List(Heap::new(ListValue { elem, items }))
    }

    /// `<key, value>{entries...}`
    #[inline]
    pub fn map(key: Idx, value: Idx, entries: Vec<(Value, Value)>) -> Self {
        Value::Map(Heap::new(MapValue {
            key,
            value,
            entries,
        }))
    }

    #[inline]
    pub fn record(positional: Vec<Value>, named: Vec<(Name, Value)>) -> Self {
        Value::Record(Heap::new(RecordValue { positional, named }))
    }

    /// An instance of class type `ty`.
    #[inline]
    pub fn object(ty: Idx, fields: Vec<(Name, Value)>) -> Self {
        Value::Object(Heap::new(ObjectValue { ty, fields }))
    }

    /// Materialize a compile-time constant.
    pub fn from_const<I: StringLookup + ?Sized>(value: ConstValue, lookup: &I) -> Self {
        match value {
            ConstValue::Null => Value::Null,
            ConstValue::Bool(b) => Value::Bool(b),
            ConstValue::Int(i) => Value::Int(i),
            ConstValue::Double(bits) => Value::Double(f64::from_bits(bits)),
            ConstValue::Str(s) => Value::string(lookup.lookup(s)),
            ConstValue::Enum { ty, variant } => Value::Enum { ty, variant },
        }
    }
}

// Value Methods

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The exact runtime type, interned in `pool`.
    pub fn runtime_type(&self, pool: &mut Pool) -> Idx {
        match self {
            Value::Null => Idx::NULL,
            Value::Bool(_) => Idx::BOOL,
            Value::Int(_) => Idx::INT,
            Value::Double(_) => Idx::DOUBLE,
            Value::Str(_) => Idx::STR,
            Value::List(list) => pool.list(list.elem),
            Value::Map(map) => pool.map(map.key, map.value),
            Value::Record(record) => {
                let positional: Vec<Idx> = record
                    .positional
                    .iter()
                    .map(|v| v.runtime_type(pool))
                    .collect();
                let named: Vec<(Name, Idx)> = record
                    .named
                    .iter()
                    .map(|(n, v)| (*n, v.runtime_type(pool)))
                    .collect();
                pool.record(&positional, &named)
            }
            Value::Object(object) => object.ty,
            Value::Enum { ty, .. } => pool.named(*ty, &[]),
        }
    }

    /// Short kind name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Str(_) => "String",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Record(_) => "Record",
            Value::Object(_) => "Object",
            Value::Enum { .. } => "enum",
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "numeric equality compares an int with a double the way the language does"
)]
fn int_equals_double(i: i64, d: f64) -> bool {
    i as f64 == d
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Int(i), Value::Double(d)) | (Value::Double(d), Value::Int(i)) => {
                int_equals_double(*i, *d)
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a.items == b.items,
            (Value::Map(a), Value::Map(b)) => {
                a.entries.len() == b.entries.len()
                    && a.entries.iter().all(|(k, v)| b.get(k) == Some(v))
            }
            (Value::Record(a), Value::Record(b)) => {
                a.positional == b.positional
                    && a.named.len() == b.named.len()
                    && a.named.iter().all(|(n, v)| b.named_field(*n) == Some(v))
            }
            (Value::Object(a), Value::Object(b)) => a.ty == b.ty && a.fields == b.fields,
            (
                Value::Enum {
                    ty: t1,
                    variant: v1,
                },
                Value::Enum {
                    ty: t2,
                    variant: v2,
                },
            ) => t1 == t2 && v1 == v2,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Double(d) => write!(f, "{d:?}"),
            Value::Str(s) => write!(f, "{:?}", &**s),
            Value::List(list) => {
                f.write_str("[")?;
                for (i, item) in list.items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Record(record) => {
                f.write_str("(")?;
                for (i, v) in record.positional.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                if !record.named.is_empty() {
                    f.write_str(", ...")?;
                }
                f.write_str(")")
            }
            Value::Object(_) => f.write_str("<object>"),
            Value::Enum { .. } => f.write_str("<enum>"),
        }
    }
}

#[cfg(test)]
mod tests;
