//! Type pool: hash-consed storage for every type the engine sees.
//!
//! Each type is an `Item` (tag + data word) plus pre-computed `TypeFlags`.
//! Compound types with more than one child keep their children in the
//! `extra` array. Interning guarantees that structurally equal types share
//! one `Idx`, so type equality is index equality.

mod construct;
mod format;

use rustc_hash::FxHashMap;
use sift_ir::Name;
use smallvec::SmallVec;

use crate::{Idx, Tag, TypeFlags};

/// One pooled type.
#[derive(Copy, Clone, Debug)]
struct Item {
    tag: Tag,
    data: u32,
}

/// Interning key: the tag plus the data words that identify the type.
type InternKey = (Tag, SmallVec<[u32; 4]>);

/// Field types of a record, with named fields in canonical order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RecordShape {
    pub positional: Vec<Idx>,
    pub named: Vec<(Name, Idx)>,
}

impl RecordShape {
    /// Same number of positional fields and the same set of named fields.
    pub fn same_shape(&self, other: &RecordShape) -> bool {
        self.positional.len() == other.positional.len()
            && self.named.len() == other.named.len()
            && self
                .named
                .iter()
                .zip(&other.named)
                .all(|((a, _), (b, _))| a == b)
    }

    /// Field types in canonical order: positional first, then named.
    pub fn field_types(&self) -> impl Iterator<Item = Idx> + '_ {
        self.positional
            .iter()
            .copied()
            .chain(self.named.iter().map(|&(_, ty)| ty))
    }
}

/// Storage for all types.
pub struct Pool {
    items: Vec<Item>,
    flags: Vec<TypeFlags>,
    extra: Vec<u32>,
    interned: FxHashMap<InternKey, Idx>,
}

impl Pool {
    /// Create a pool with the pre-interned types at their fixed indices.
    pub fn new() -> Self {
        let mut pool = Pool {
            items: Vec::with_capacity(64),
            flags: Vec::with_capacity(64),
            extra: Vec::with_capacity(128),
            interned: FxHashMap::default(),
        };
        for raw in 0..Idx::PRIMITIVE_COUNT {
            if let Some(tag) = Tag::primitive(raw) {
                pool.items.push(Item { tag, data: 0 });
                pool.flags.push(TypeFlags::for_primitive(Idx::from_raw(raw)));
            }
        }
        pool
    }

    fn next_idx(&self) -> Idx {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "type counts are bounded far below u32::MAX"
        )]
        let raw = self.items.len() as u32;
        Idx::from_raw(raw)
    }

    /// Intern a single-child type.
    pub(crate) fn intern(&mut self, tag: Tag, child: Idx) -> Idx {
        debug_assert!(tag.uses_child());
        let key: InternKey = (tag, SmallVec::from_slice(&[child.raw()]));
        if let Some(&idx) = self.interned.get(&key) {
            return idx;
        }
        let idx = self.next_idx();
        let flags = TypeFlags::for_compound(tag, [self.flags(child)]);
        self.items.push(Item {
            tag,
            data: child.raw(),
        });
        self.flags.push(flags);
        self.interned.insert(key, idx);
        idx
    }

    /// Intern a type whose identity is a slice of the extra array.
    ///
    /// `children` are the `Idx` values embedded in `words`, used only for
    /// flag computation.
    pub(crate) fn intern_complex(&mut self, tag: Tag, words: &[u32], children: &[Idx]) -> Idx {
        debug_assert!(tag.uses_extra());
        let key: InternKey = (tag, SmallVec::from_slice(words));
        if let Some(&idx) = self.interned.get(&key) {
            return idx;
        }
        let idx = self.next_idx();
        let flags = TypeFlags::for_compound(tag, children.iter().map(|&c| self.flags(c)));
        #[expect(
            clippy::cast_possible_truncation,
            reason = "extra array is bounded far below u32::MAX"
        )]
        let start = self.extra.len() as u32;
        self.extra.extend_from_slice(words);
        self.items.push(Item { tag, data: start });
        self.flags.push(flags);
        self.interned.insert(key, idx);
        idx
    }

    #[inline]
    pub fn tag(&self, idx: Idx) -> Tag {
        self.items[idx.raw() as usize].tag
    }

    #[inline]
    pub fn flags(&self, idx: Idx) -> TypeFlags {
        self.flags[idx.raw() as usize]
    }

    #[inline]
    fn data(&self, idx: Idx) -> u32 {
        self.items[idx.raw() as usize].data
    }

    #[inline]
    fn extra_at(&self, pos: u32) -> u32 {
        self.extra[pos as usize]
    }

    /// Whether `null` belongs to `idx`.
    #[inline]
    pub fn is_nullable(&self, idx: Idx) -> bool {
        self.flags(idx).is_nullable()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // === Accessors ===

    /// `E` of `List<E>`.
    pub fn list_elem(&self, idx: Idx) -> Option<Idx> {
        (self.tag(idx) == Tag::List).then(|| Idx::from_raw(self.data(idx)))
    }

    /// `T` of `T?`.
    pub fn nullable_inner(&self, idx: Idx) -> Option<Idx> {
        (self.tag(idx) == Tag::Nullable).then(|| Idx::from_raw(self.data(idx)))
    }

    /// `(K, V)` of `Map<K, V>`.
    pub fn map_types(&self, idx: Idx) -> Option<(Idx, Idx)> {
        if self.tag(idx) != Tag::Map {
            return None;
        }
        let start = self.data(idx);
        Some((
            Idx::from_raw(self.extra_at(start)),
            Idx::from_raw(self.extra_at(start + 1)),
        ))
    }

    /// Field types of a record type.
    pub fn record_shape(&self, idx: Idx) -> Option<RecordShape> {
        if self.tag(idx) != Tag::Record {
            return None;
        }
        let mut pos = self.data(idx);
        let n_pos = self.extra_at(pos);
        pos += 1;
        let positional = (0..n_pos)
            .map(|i| Idx::from_raw(self.extra_at(pos + i)))
            .collect();
        pos += n_pos;
        let n_named = self.extra_at(pos);
        pos += 1;
        let named = (0..n_named)
            .map(|i| {
                let at = pos + 2 * i;
                (
                    Name::from_raw(self.extra_at(at)),
                    Idx::from_raw(self.extra_at(at + 1)),
                )
            })
            .collect();
        Some(RecordShape { positional, named })
    }

    /// Class name and type arguments of a class instance type.
    pub fn named_parts(&self, idx: Idx) -> Option<(Name, Vec<Idx>)> {
        if self.tag(idx) != Tag::Named {
            return None;
        }
        let start = self.data(idx);
        let name = Name::from_raw(self.extra_at(start));
        let n_args = self.extra_at(start + 1);
        let args = (0..n_args)
            .map(|i| Idx::from_raw(self.extra_at(start + 2 + i)))
            .collect();
        Some((name, args))
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}
