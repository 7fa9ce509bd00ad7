//! Type annotations as written in patterns.
//!
//! A `ParsedType` is syntax: names are unresolved. The type oracle turns it
//! into a pooled type during checking, reporting unknown names there.

use crate::Name;

/// A type written in a pattern (`int x`, `as List<String>`, `Point(...)`).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParsedType {
    /// `dynamic`
    Dynamic,
    /// `Foo`, `List<int>`, `Map<String, int>`
    Named { name: Name, args: Vec<ParsedType> },
    /// `T?`
    Nullable(Box<ParsedType>),
    /// `(int, {String name})`
    Record {
        positional: Vec<ParsedType>,
        named: Vec<(Name, ParsedType)>,
    },
}

impl ParsedType {
    /// A non-generic named type.
    pub fn named(name: Name) -> Self {
        ParsedType::Named {
            name,
            args: Vec::new(),
        }
    }

    /// A named type with explicit type arguments.
    pub fn generic(name: Name, args: Vec<ParsedType>) -> Self {
        ParsedType::Named { name, args }
    }

    /// Wrap in `?`. Already-nullable types are returned unchanged.
    #[must_use]
    pub fn nullable(self) -> Self {
        match self {
            ParsedType::Nullable(_) | ParsedType::Dynamic => self,
            other => ParsedType::Nullable(Box::new(other)),
        }
    }

    pub fn record(positional: Vec<ParsedType>, named: Vec<(Name, ParsedType)>) -> Self {
        ParsedType::Record { positional, named }
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ParsedType::Dynamic)
    }
}
