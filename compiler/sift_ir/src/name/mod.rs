//! Interned identifiers.

use std::fmt;

/// An interned string: variable, getter, type and key names all become a
/// `Name`, so comparing them is comparing two integers.
///
/// The high [`Name::SHARD_BITS`] bits select the interner shard and the
/// rest index into it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    pub const SHARD_BITS: u32 = 4;
    const LOCAL_BITS: u32 = u32::BITS - Self::SHARD_BITS;

    pub const NUM_SHARDS: usize = 1 << Self::SHARD_BITS;
    pub const MAX_LOCAL: u32 = (1 << Self::LOCAL_BITS) - 1;

    /// `""`, the first string of shard 0.
    pub const EMPTY: Name = Name(0);

    /// `_`. The interner's shard hash sends it to the last shard, where it is
    /// interned first. Patterns named `_` never bind.
    pub const WILDCARD: Name = Name::new(15, 0);

    #[inline]
    pub const fn new(shard: u32, local: u32) -> Self {
        debug_assert!((shard as usize) < Self::NUM_SHARDS);
        debug_assert!(local <= Self::MAX_LOCAL);
        Name((shard << Self::LOCAL_BITS) | local)
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> Self::LOCAL_BITS) as usize
    }

    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }

    #[inline]
    pub const fn is_wildcard(self) -> bool {
        self.0 == Self::WILDCARD.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            f.write_str("Name(_)")
        } else {
            write!(f, "Name(shard={}, local={})", self.shard(), self.local())
        }
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
