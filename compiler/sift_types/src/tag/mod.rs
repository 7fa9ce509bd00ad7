//! Type kind tag for tag-driven dispatch.
//!
//! Tags are organized into ranges:
//! - 0-15: pre-interned types (data unused)
//! - 16-31: single-child types (data = child Idx)
//! - 32-47: two-child types (data = extra index)
//! - 48-79: variable-length types (data = extra index, length-prefixed)
//! - 80-95: named types (data = extra index)

use std::fmt;

/// Type kind discriminant.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum Tag {
    // === Pre-interned (0-15) ===
    Dynamic = 0,
    ObjectQ = 1,
    Object = 2,
    Null = 3,
    Never = 4,
    Bool = 5,
    Int = 6,
    Double = 7,
    Num = 8,
    Str = 9,
    Error = 10,
    Hole = 11,

    // === Single child (16-31) ===
    /// `List<E>`
    List = 16,
    /// `T?` for a non-nullable `T`
    Nullable = 17,

    // === Two children (32-47) ===
    /// `Map<K, V>`; extra: `[key, value]`
    Map = 32,

    // === Variable length (48-79) ===
    /// `(T1, T2, {T3 a})`; extra: `[n_pos, pos.., n_named, (name, ty)..]`
    Record = 48,

    // === Named (80-95) ===
    /// Class instance `C<A1, A2>`; extra: `[name, n_args, args..]`
    Named = 80,
}

impl Tag {
    #[inline]
    pub const fn is_primitive(self) -> bool {
        (self as u8) < 16
    }

    /// Tags whose data field is a single child index.
    #[inline]
    pub const fn uses_child(self) -> bool {
        matches!(self, Tag::List | Tag::Nullable)
    }

    /// Tags whose data field points into the extra array.
    #[inline]
    pub const fn uses_extra(self) -> bool {
        matches!(self, Tag::Map | Tag::Record | Tag::Named)
    }

    /// The tag of a pre-interned type, by raw index.
    pub const fn primitive(raw: u32) -> Option<Tag> {
        Some(match raw {
            0 => Tag::Dynamic,
            1 => Tag::ObjectQ,
            2 => Tag::Object,
            3 => Tag::Null,
            4 => Tag::Never,
            5 => Tag::Bool,
            6 => Tag::Int,
            7 => Tag::Double,
            8 => Tag::Num,
            9 => Tag::Str,
            10 => Tag::Error,
            11 => Tag::Hole,
            _ => return None,
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Tag::Dynamic => "dynamic",
            Tag::ObjectQ => "Object?",
            Tag::Object => "Object",
            Tag::Null => "Null",
            Tag::Never => "Never",
            Tag::Bool => "bool",
            Tag::Int => "int",
            Tag::Double => "double",
            Tag::Num => "num",
            Tag::Str => "String",
            Tag::Error => "<error>",
            Tag::Hole => "_",
            Tag::List => "List",
            Tag::Nullable => "nullable",
            Tag::Map => "Map",
            Tag::Record => "record",
            Tag::Named => "named",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests;
