//! Per-attempt memoization of member accesses.
//!
//! Every getter, operator, index and lookup the matcher performs on the
//! subject goes through [`InvocationKeyCache::get_or_compute`], keyed by the
//! access's [`PathId`]. Within one match attempt each distinct access runs
//! at most once, so patterns over impure objects see a consistent snapshot.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{EvalResult, PathId, Value};

#[derive(Default, Debug)]
pub struct InvocationKeyCache {
    values: FxHashMap<PathId, Value>,
    hits: usize,
    misses: usize,
}

impl InvocationKeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached value of `path`, computing and storing it on first use.
    ///
    /// Errors are returned without being stored; they abort the attempt.
    pub fn get_or_compute(
        &mut self,
        path: PathId,
        compute: impl FnOnce() -> EvalResult,
    ) -> EvalResult {
        if let Some(value) = self.values.get(&path) {
            self.hits += 1;
            trace!(path = path.raw(), "invocation cache hit");
            return Ok(value.clone());
        }
        self.misses += 1;
        trace!(path = path.raw(), "invocation cache miss");
        let value = compute()?;
        self.values.insert(path, value.clone());
        Ok(value)
    }

    pub fn get(&self, path: PathId) -> Option<&Value> {
        self.values.get(&path)
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of accesses actually evaluated.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests;
