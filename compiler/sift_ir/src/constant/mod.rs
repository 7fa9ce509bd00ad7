//! Constant expressions referenced from patterns.
//!
//! Relational operands, constant patterns and map keys must be constant.
//! A pattern holds a `ConstId`; the expression behind it is either a literal
//! value or a reference to a name that the type checker resolves (and
//! rejects if the name is not a constant).

use std::fmt;

use crate::{Name, Span, StringLookup};

/// Index of a constant expression in a [`ConstArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ConstId(u32);

impl ConstId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ConstId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A fully evaluated compile-time constant.
///
/// `Double` stores the IEEE bits so the value is `Eq + Hash` and can be used
/// inside access-path keys and duplicate-key checks.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConstValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(u64),
    Str(Name),
    /// `Color.red`
    Enum { ty: Name, variant: Name },
}

impl ConstValue {
    #[inline]
    pub fn double(value: f64) -> Self {
        ConstValue::Double(value.to_bits())
    }

    #[inline]
    pub fn as_double(self) -> Option<f64> {
        match self {
            ConstValue::Double(bits) => Some(f64::from_bits(bits)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(self) -> bool {
        matches!(self, ConstValue::Null)
    }

    /// Render for diagnostics.
    pub fn display<'a, I: StringLookup>(&'a self, lookup: &'a I) -> impl fmt::Display + 'a {
        ConstDisplay {
            value: *self,
            lookup,
        }
    }
}

struct ConstDisplay<'a, I> {
    value: ConstValue,
    lookup: &'a I,
}

impl<I: StringLookup> fmt::Display for ConstDisplay<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            ConstValue::Null => f.write_str("null"),
            ConstValue::Bool(b) => write!(f, "{b}"),
            ConstValue::Int(i) => write!(f, "{i}"),
            ConstValue::Double(bits) => write!(f, "{:?}", f64::from_bits(bits)),
            ConstValue::Str(s) => write!(f, "{:?}", self.lookup.lookup(s)),
            ConstValue::Enum { ty, variant } => write!(
                f,
                "{}.{}",
                self.lookup.lookup(ty),
                self.lookup.lookup(variant)
            ),
        }
    }
}

/// A constant expression as written.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConstExpr {
    /// A literal.
    Value(ConstValue),
    /// A bare or qualified name, resolved against the enclosing scope.
    Reference(Name),
}

/// Storage for the constant expressions of one or more pattern trees.
#[derive(Clone, Default, Debug)]
pub struct ConstArena {
    exprs: Vec<ConstExpr>,
    spans: Vec<Span>,
}

impl ConstArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a constant expression.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` constants are allocated.
    pub fn alloc(&mut self, expr: ConstExpr, span: Span) -> ConstId {
        let id = u32::try_from(self.exprs.len())
            .unwrap_or_else(|_| panic!("constant arena exceeded u32::MAX entries"));
        self.exprs.push(expr);
        self.spans.push(span);
        ConstId::new(id)
    }

    /// Allocate a literal.
    pub fn value(&mut self, value: ConstValue, span: Span) -> ConstId {
        self.alloc(ConstExpr::Value(value), span)
    }

    /// Allocate a name reference.
    pub fn reference(&mut self, name: Name, span: Span) -> ConstId {
        self.alloc(ConstExpr::Reference(name), span)
    }

    #[inline]
    pub fn get(&self, id: ConstId) -> &ConstExpr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn span(&self, id: ConstId) -> Span {
        self.spans[id.index()]
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

#[cfg(test)]
mod tests;
