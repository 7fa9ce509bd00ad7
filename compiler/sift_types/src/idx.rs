//! Type index handle.
//!
//! Every type lives in the [`Pool`](crate::Pool) and is referred to by a
//! 32-bit `Idx`. Compound types are hash-consed, so two indices are equal
//! exactly when the types are structurally equal.

use std::fmt;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Pre-interned types (indices 0-11) ===

    /// `dynamic`: statically unchecked; assignable to anything via an implicit cast.
    pub const DYNAMIC: Self = Self(0);
    /// `Object?`: the top type.
    pub const OBJECT_Q: Self = Self(1);
    /// `Object`: every non-null value.
    pub const OBJECT: Self = Self(2);
    /// `Null`: the type of `null`.
    pub const NULL: Self = Self(3);
    /// `Never`: the bottom type.
    pub const NEVER: Self = Self(4);
    pub const BOOL: Self = Self(5);
    pub const INT: Self = Self(6);
    pub const DOUBLE: Self = Self(7);
    /// `num`: supertype of `int` and `double`.
    pub const NUM: Self = Self(8);
    pub const STR: Self = Self(9);
    /// Placeholder for a type that failed to resolve; absorbs further errors.
    pub const ERROR: Self = Self(10);
    /// `_`: the unknown part of a context type schema.
    pub const HOLE: Self = Self(11);

    /// Number of pre-interned types.
    pub const PRIMITIVE_COUNT: u32 = 12;

    /// First index for compound types.
    pub const FIRST_DYNAMIC: u32 = Self::PRIMITIVE_COUNT;

    /// Sentinel value indicating no type.
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }

    #[inline]
    pub const fn is_dynamic(self) -> bool {
        self.0 == Self::DYNAMIC.0
    }

    #[inline]
    pub const fn is_hole(self) -> bool {
        self.0 == Self::HOLE.0
    }

    /// `dynamic`, `Object?`, the hole and the error type accept every value.
    #[inline]
    pub const fn is_top(self) -> bool {
        matches!(self.0, 0 | 1 | 10 | 11)
    }

    /// Name of a pre-interned type, `None` for compound types.
    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("dynamic"),
            1 => Some("Object?"),
            2 => Some("Object"),
            3 => Some("Null"),
            4 => Some("Never"),
            5 => Some("bool"),
            6 => Some("int"),
            7 => Some("double"),
            8 => Some("num"),
            9 => Some("String"),
            10 => Some("<error>"),
            11 => Some("_"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), *self) {
            (Some(name), _) => write!(f, "Idx({name})"),
            (None, Self::NONE) => write!(f, "Idx::NONE"),
            (None, _) => write!(f, "Idx({})", self.0),
        }
    }
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "type#{}", self.0),
        }
    }
}

const _: () = assert!(std::mem::size_of::<Idx>() == 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_names() {
        assert_eq!(Idx::INT.name(), Some("int"));
        assert_eq!(Idx::OBJECT_Q.name(), Some("Object?"));
        assert_eq!(Idx::HOLE.to_string(), "_");
        assert_eq!(Idx::from_raw(40).name(), None);
        assert_eq!(Idx::from_raw(40).to_string(), "type#40");
    }

    #[test]
    fn top_types() {
        for idx in [Idx::DYNAMIC, Idx::OBJECT_Q, Idx::ERROR, Idx::HOLE] {
            assert!(idx.is_top(), "{idx:?}");
        }
        for idx in [Idx::OBJECT, Idx::NULL, Idx::NEVER, Idx::INT] {
            assert!(!idx.is_top(), "{idx:?}");
        }
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Idx::NUM), "Idx(num)");
        assert_eq!(format!("{:?}", Idx::NONE), "Idx::NONE");
        assert_eq!(format!("{:?}", Idx::from_raw(99)), "Idx(99)");
    }
}
