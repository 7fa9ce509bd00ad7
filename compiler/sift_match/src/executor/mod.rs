//! The host seen by the matcher.
//!
//! Member access on the subject can run arbitrary code: a getter may have
//! side effects, an operator may throw. The matcher never touches a value's
//! members itself; it asks a [`MatchExecutor`], and only through the
//! invocation cache, so each access reaches the host at most once per
//! attempt.
//!
//! The collection accessors have defaults for the built-in list and map
//! values. Hosts with their own collections override them.

mod builtin;
mod recording;

use sift_ir::RelationalOp;
use sift_types::{ExtensionRef, GetterRef};

use crate::errors::member_not_found;
use crate::{EvalResult, Value};

pub use builtin::{BuiltinExecutor, NativeGetter, NativeOperator};
pub use recording::RecordingHost;

/// Member invocation interface.
pub trait MatchExecutor {
    /// Invoke `getter` on `receiver`.
    fn get(&mut self, receiver: &Value, getter: &GetterRef) -> EvalResult;

    /// Invoke relational operator `op` on `receiver`.
    ///
    /// `!=` is never passed; the matcher negates `==`.
    fn compare(
        &mut self,
        receiver: &Value,
        op: RelationalOp,
        extension: Option<&ExtensionRef>,
        operand: &Value,
    ) -> EvalResult;

    /// `constant == value`, with the constant as receiver.
    fn equals(&mut self, constant: &Value, value: &Value) -> EvalResult<bool> {
        Ok(constant == value)
    }

    /// Reported length of a list. Non-positive lengths count as empty.
    fn length(&mut self, list: &Value) -> EvalResult<i64> {
        let items = list_items(list, "length")?;
        Ok(i64::try_from(items.len()).unwrap_or(i64::MAX))
    }

    /// `list[index]`
    fn index(&mut self, list: &Value, index: usize) -> EvalResult {
        let items = list_items(list, "[]")?;
        items
            .get(index)
            .cloned()
            .ok_or_else(|| member_not_found(&format!("[{index}]"), list.kind_name()))
    }

    /// `list.sublist(start, end)`, keeping the list's element type.
    fn sublist(&mut self, list: &Value, start: usize, end: usize) -> EvalResult {
        let Value::List(inner) = list else {
            return Err(member_not_found("sublist", list.kind_name()));
        };
        let items = inner
            .items
            .get(start..end)
            .ok_or_else(|| member_not_found(&format!("sublist({start}, {end})"), "List"))?;
        Ok(Value::list(inner.elem, items.to_vec()))
    }

    /// `map[key]`; `null` when the key is absent.
    fn lookup(&mut self, map: &Value, key: &Value) -> EvalResult {
        let Some(inner) = map.as_map() else {
            return Err(member_not_found("[]", map.kind_name()));
        };
        Ok(inner.get(key).cloned().unwrap_or(Value::Null))
    }

    fn contains_key(&mut self, map: &Value, key: &Value) -> EvalResult<bool> {
        let Some(inner) = map.as_map() else {
            return Err(member_not_found("containsKey", map.kind_name()));
        };
        Ok(inner.contains_key(key))
    }
}

fn list_items<'v>(list: &'v Value, member: &str) -> EvalResult<&'v [Value]> {
    list.as_list()
        .map(|inner| inner.items.as_slice())
        .ok_or_else(|| member_not_found(member, list.kind_name()))
}
