//! A host wrapper that records every invocation.

use rustc_hash::FxHashMap;
use sift_ir::{Name, RelationalOp, StringLookup};
use sift_types::{ExtensionRef, GetterRef};

use super::MatchExecutor;
use crate::errors::host_error;
use crate::{EvalResult, Value};

/// Wraps a host, logging each invocation that reaches it.
///
/// Because the matcher only calls its host on invocation cache misses, the
/// log is exactly the sequence of member accesses a match attempt
/// performed, in evaluation order. Getters can also be made to throw.
pub struct RecordingHost<'s, H> {
    inner: H,
    strings: &'s dyn StringLookup,
    log: Vec<String>,
    getter_calls: FxHashMap<Name, usize>,
    failures: FxHashMap<Name, String>,
}

impl<'s, H: MatchExecutor> RecordingHost<'s, H> {
    pub fn new(inner: H, strings: &'s dyn StringLookup) -> Self {
        RecordingHost {
            inner,
            strings,
            log: Vec::new(),
            getter_calls: FxHashMap::default(),
            failures: FxHashMap::default(),
        }
    }

    /// Make getter `name` throw `message` instead of running.
    #[must_use]
    pub fn failing_getter(mut self, name: Name, message: impl Into<String>) -> Self {
        self.failures.insert(name, message.into());
        self
    }

    /// Invocations in the order they happened.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Times getter `name` was invoked.
    pub fn getter_calls(&self, name: Name) -> usize {
        self.getter_calls.get(&name).copied().unwrap_or(0)
    }

    pub fn invocations(&self) -> usize {
        self.log.len()
    }

    pub fn clear(&mut self) {
        self.log.clear();
        self.getter_calls.clear();
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: MatchExecutor> MatchExecutor for RecordingHost<'_, H> {
    fn get(&mut self, receiver: &Value, getter: &GetterRef) -> EvalResult {
        let name = self.strings.lookup(getter.name);
        self.log.push(format!("get {name}"));
        *self.getter_calls.entry(getter.name).or_insert(0) += 1;
        if let Some(message) = self.failures.get(&getter.name) {
            return Err(host_error(message.clone()));
        }
        self.inner.get(receiver, getter)
    }

    fn compare(
        &mut self,
        receiver: &Value,
        op: RelationalOp,
        extension: Option<&ExtensionRef>,
        operand: &Value,
    ) -> EvalResult {
        self.log.push(format!("{receiver} {op} {operand}"));
        self.inner.compare(receiver, op, extension, operand)
    }

    fn equals(&mut self, constant: &Value, value: &Value) -> EvalResult<bool> {
        self.log.push(format!("{constant} == {value}"));
        self.inner.equals(constant, value)
    }

    fn length(&mut self, list: &Value) -> EvalResult<i64> {
        self.log.push("length".to_string());
        self.inner.length(list)
    }

    fn index(&mut self, list: &Value, index: usize) -> EvalResult {
        self.log.push(format!("[{index}]"));
        self.inner.index(list, index)
    }

    fn sublist(&mut self, list: &Value, start: usize, end: usize) -> EvalResult {
        self.log.push(format!("sublist({start}, {end})"));
        self.inner.sublist(list, start, end)
    }

    fn lookup(&mut self, map: &Value, key: &Value) -> EvalResult {
        self.log.push(format!("[{key}]"));
        self.inner.lookup(map, key)
    }

    fn contains_key(&mut self, map: &Value, key: &Value) -> EvalResult<bool> {
        self.log.push(format!("containsKey({key})"));
        self.inner.contains_key(map, key)
    }
}
