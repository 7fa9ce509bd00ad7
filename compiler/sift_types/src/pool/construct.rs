//! Type construction helpers for the Pool.
//!
//! Constructors normalize as they intern: `int??` is `int?`, `Object` made
//! nullable is `Object?`, and so on, so equal types always get equal indices.

use sift_ir::Name;

use super::RecordShape;
use crate::{Idx, Pool, Tag};

impl Pool {
    /// `List<elem>`
    pub fn list(&mut self, elem: Idx) -> Idx {
        self.intern(Tag::List, elem)
    }

    /// `Map<key, value>`
    pub fn map(&mut self, key: Idx, value: Idx) -> Idx {
        self.intern_complex(Tag::Map, &[key.raw(), value.raw()], &[key, value])
    }

    /// `inner?`
    pub fn nullable(&mut self, inner: Idx) -> Idx {
        match inner {
            Idx::DYNAMIC | Idx::OBJECT_Q | Idx::NULL | Idx::ERROR | Idx::HOLE => inner,
            Idx::OBJECT => Idx::OBJECT_Q,
            Idx::NEVER => Idx::NULL,
            _ if self.tag(inner) == Tag::Nullable => inner,
            _ => self.intern(Tag::Nullable, inner),
        }
    }

    /// The non-nullable part of `ty`.
    ///
    /// `dynamic`, the hole and the error type are left as they are.
    pub fn non_null(&self, ty: Idx) -> Idx {
        match ty {
            Idx::OBJECT_Q => Idx::OBJECT,
            Idx::NULL => Idx::NEVER,
            _ => self.nullable_inner(ty).unwrap_or(ty),
        }
    }

    /// A record type. Named fields are sorted into canonical order.
    pub fn record(&mut self, positional: &[Idx], named: &[(Name, Idx)]) -> Idx {
        let mut named = named.to_vec();
        named.sort_by_key(|&(name, _)| name);

        let mut words = Vec::with_capacity(2 + positional.len() + 2 * named.len());
        let mut children = Vec::with_capacity(positional.len() + named.len());
        words.push(count_word(positional.len()));
        words.extend(positional.iter().map(|ty| ty.raw()));
        words.push(count_word(named.len()));
        children.extend_from_slice(positional);
        for &(name, ty) in &named {
            words.push(name.raw());
            words.push(ty.raw());
            children.push(ty);
        }
        self.intern_complex(Tag::Record, &words, &children)
    }

    /// A record type from a shape.
    pub fn record_from_shape(&mut self, shape: &RecordShape) -> Idx {
        self.record(&shape.positional, &shape.named)
    }

    /// A class instance type `name<args>`.
    pub fn named(&mut self, name: Name, args: &[Idx]) -> Idx {
        let mut words = Vec::with_capacity(2 + args.len());
        words.push(name.raw());
        words.push(count_word(args.len()));
        words.extend(args.iter().map(|ty| ty.raw()));
        self.intern_complex(Tag::Named, &words, args)
    }
}

/// Arity word stored in the extra array.
fn count_word(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
