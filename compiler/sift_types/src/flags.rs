//! Pre-computed type metadata flags.
//!
//! `TypeFlags` are computed once when a type is interned and let the
//! inferencer and matcher answer "is this nullable?" or "does this contain
//! a hole?" without walking the type.

use bitflags::bitflags;

use crate::{Idx, Tag};

bitflags! {
    /// Pre-computed type properties.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u32 {
        // === Presence Flags (bits 0-7) ===
        // Propagate from children to parents.

        /// Contains a schema hole.
        const HAS_HOLE = 1 << 0;
        /// Contains `dynamic`.
        const HAS_DYNAMIC = 1 << 1;
        /// Contains the error type.
        const HAS_ERROR = 1 << 2;

        // === Category Flags (bits 8-15) ===

        /// Pre-interned type.
        const IS_PRIMITIVE = 1 << 8;
        /// `List` or `Map`.
        const IS_CONTAINER = 1 << 9;
        /// Record type.
        const IS_RECORD = 1 << 10;
        /// Class instance type.
        const IS_NAMED = 1 << 11;

        // === Value Flags (bits 16-23) ===

        /// `null` is a member of this type.
        const IS_NULLABLE = 1 << 16;
    }
}

impl TypeFlags {
    /// Flags a parent inherits from a child.
    pub const PROPAGATE: TypeFlags = TypeFlags::HAS_HOLE
        .union(TypeFlags::HAS_DYNAMIC)
        .union(TypeFlags::HAS_ERROR);

    /// Flags of a pre-interned type.
    pub fn for_primitive(idx: Idx) -> TypeFlags {
        let mut flags = TypeFlags::IS_PRIMITIVE;
        match idx {
            Idx::DYNAMIC => flags |= TypeFlags::HAS_DYNAMIC | TypeFlags::IS_NULLABLE,
            Idx::OBJECT_Q | Idx::NULL => flags |= TypeFlags::IS_NULLABLE,
            Idx::ERROR => flags |= TypeFlags::HAS_ERROR | TypeFlags::IS_NULLABLE,
            Idx::HOLE => flags |= TypeFlags::HAS_HOLE,
            _ => {}
        }
        flags
    }

    /// Flags of a compound type given its tag and children's flags.
    pub fn for_compound(tag: Tag, children: impl IntoIterator<Item = TypeFlags>) -> TypeFlags {
        let mut flags = match tag {
            Tag::List | Tag::Map => TypeFlags::IS_CONTAINER,
            Tag::Record => TypeFlags::IS_RECORD,
            Tag::Named => TypeFlags::IS_NAMED,
            Tag::Nullable => TypeFlags::IS_NULLABLE,
            _ => TypeFlags::empty(),
        };
        for child in children {
            flags |= child & TypeFlags::PROPAGATE;
        }
        flags
    }

    #[inline]
    pub fn has_hole(self) -> bool {
        self.contains(TypeFlags::HAS_HOLE)
    }

    #[inline]
    pub fn is_nullable(self) -> bool {
        self.contains(TypeFlags::IS_NULLABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_nullability() {
        assert!(TypeFlags::for_primitive(Idx::NULL).is_nullable());
        assert!(TypeFlags::for_primitive(Idx::OBJECT_Q).is_nullable());
        assert!(TypeFlags::for_primitive(Idx::DYNAMIC).is_nullable());
        assert!(!TypeFlags::for_primitive(Idx::OBJECT).is_nullable());
        assert!(!TypeFlags::for_primitive(Idx::INT).is_nullable());
    }

    #[test]
    fn presence_flags_propagate_but_nullability_does_not() {
        let hole = TypeFlags::for_primitive(Idx::HOLE);
        let null = TypeFlags::for_primitive(Idx::NULL);
        let list = TypeFlags::for_compound(Tag::List, [hole, null]);

        assert!(list.has_hole());
        assert!(!list.is_nullable());
        assert!(list.contains(TypeFlags::IS_CONTAINER));
        assert!(!list.contains(TypeFlags::IS_PRIMITIVE));
    }
}
