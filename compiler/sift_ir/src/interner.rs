//! Sharded string interner for identifiers, member names and string constants.
//!
//! A string maps to one of sixteen buckets by a hash of its first bytes;
//! each bucket has its own lock, so an interner borrowed by several engines
//! only contends when two of them intern into the same bucket.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Name;

/// Names every engine asks for while building a type registry or a pattern.
/// `_` comes first in its bucket, which is what fixes `Name::WILDCARD`.
const PRELUDE: &[&str] = &[
    "_", "dynamic", "Object", "Null", "Never", "bool", "int", "double", "num", "String", "List",
    "Map", "null", "true", "false",
];

#[derive(Default)]
struct Bucket {
    index: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl Bucket {
    fn find(&self, s: &str) -> Option<u32> {
        self.index.get(s).copied()
    }

    fn push(&mut self, bucket: usize, s: &str) -> Result<u32, InternError> {
        let local = u32::try_from(self.strings.len())
            .ok()
            .filter(|&local| local <= Name::MAX_LOCAL)
            .ok_or(InternError::BucketFull { bucket })?;
        // Leaked strings outlive every lock guard, so lookups can return them.
        let stored: &'static str = Box::leak(Box::<str>::from(s));
        self.strings.push(stored);
        self.index.insert(stored, local);
        Ok(local)
    }
}

/// Interning failed because a bucket ran out of local indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    BucketFull { bucket: usize },
}

impl fmt::Display for InternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternError::BucketFull { bucket } => write!(
                f,
                "interner bucket {bucket} already holds {} names",
                u64::from(Name::MAX_LOCAL) + 1
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// Maps strings to [`Name`]s and back. Lookup never copies.
pub struct StringInterner {
    buckets: [RwLock<Bucket>; Name::NUM_SHARDS],
    count: AtomicUsize,
}

impl StringInterner {
    /// An interner holding `""` as `Name::EMPTY` plus the common builtin names.
    pub fn new() -> Self {
        let interner = StringInterner {
            buckets: std::array::from_fn(|_| RwLock::new(Bucket::default())),
            count: AtomicUsize::new(0),
        };
        for s in std::iter::once("").chain(PRELUDE.iter().copied()) {
            interner.intern(s);
        }
        interner
    }

    fn bucket_of(s: &str) -> usize {
        let hash = s
            .bytes()
            .take(8)
            .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)));
        hash as usize % Name::NUM_SHARDS
    }

    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        let bucket = Self::bucket_of(s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "bucket index is below NUM_SHARDS"
        )]
        let shard = bucket as u32;

        if let Some(local) = self.buckets[bucket].read().find(s) {
            return Ok(Name::new(shard, local));
        }
        let mut guard = self.buckets[bucket].write();
        if let Some(local) = guard.find(s) {
            return Ok(Name::new(shard, local));
        }
        let local = guard.push(bucket, s)?;
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(Name::new(shard, local))
    }

    /// # Panics
    /// When a bucket is full; see [`StringInterner::try_intern`].
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn lookup(&self, name: Name) -> &'static str {
        self.buckets[name.shard()].read().strings[name.local()]
    }

    /// Distinct strings interned so far, `""` included.
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Read access to interned names.
///
/// Formatting code (types, values, diagnostics) takes `&impl StringLookup`
/// so it does not depend on the concrete interner.
pub trait StringLookup {
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}
