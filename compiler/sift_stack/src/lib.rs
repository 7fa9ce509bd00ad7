//! Stack growth guard for recursive pattern walks.
//!
//! Every pass over a pattern tree (schema inference, required-type checking,
//! variable-set resolution, access-path binding, matching) recurses once per
//! nesting level. Pattern trees built by generated code can nest far deeper
//! than hand-written ones, so each recursive step goes through
//! [`ensure_sufficient_stack`].
//!
//! On native targets the stack is grown on demand with `stacker`; on WASM the
//! closure is called directly.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
///
/// ```text
/// fn check(&mut self, id: PatternId, matched: Idx) -> Idx {
///     ensure_sufficient_stack(|| self.check_inner(id, matched))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
