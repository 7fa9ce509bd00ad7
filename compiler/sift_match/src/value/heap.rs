//! Shared heap storage for runtime values.

#![expect(
    clippy::disallowed_types,
    reason = "Arc is the implementation of Heap<T>"
)]

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Reference-counted storage for the heap parts of a [`Value`](super::Value).
///
/// The constructor is crate-private so every heap value is built through a
/// `Value` factory method. Cloning shares the allocation, which is what lets
/// the invocation cache hand out the same list or map to several patterns.
#[repr(transparent)]
pub struct Heap<T: ?Sized>(Arc<T>);

impl<T> Heap<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }
}

impl Heap<str> {
    #[inline]
    pub(crate) fn new_str(value: &str) -> Self {
        Heap(Arc::from(value))
    }
}

impl<T: ?Sized> Heap<T> {
    /// Whether both handles share one allocation.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
