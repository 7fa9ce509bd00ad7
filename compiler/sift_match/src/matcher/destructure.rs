//! Destructuring patterns: lists, maps, records and objects.
//!
//! Each of these first tests the value's runtime type, then reads its
//! parts through the invocation cache and matches them left to right.

use sift_ir::{MapEntry, Name, ObjectField, PatternId, PatternKind, PatternRange, RecordField};
use sift_types::TypeOracle;
use tracing::trace;

use super::{MatchContext, Matcher};
use crate::errors::{member_not_found, not_annotated};
use crate::value::RecordValue;
use crate::{EvalResult, MatchExecutor, NodeAccess, NodePlan, Value};

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl<O: TypeOracle + ?Sized, H: MatchExecutor + ?Sized> Matcher<'_, O, H> {
    /// `[p1, ..., ...rest, ..., pn]`
    ///
    /// The reported length is read once. Without a rest element it must
    /// equal the element count; with one it must be at least the number of
    /// non-rest elements. A lone `...` matches any list without reading it.
    pub(super) fn match_list(
        &mut self,
        id: PatternId,
        elements: PatternRange,
        value: &Value,
        ctx: &mut MatchContext,
    ) -> EvalResult<bool> {
        if !self.type_test(id, value)? {
            return Ok(false);
        }
        let arena = self.program.arena;
        let plan = self.program.plan;
        let elements = arena.list(elements);
        let Some(NodePlan {
            access:
                NodeAccess::List {
                    length: length_path,
                    elements: paths,
                },
            ..
        }) = plan.node(id)
        else {
            return Err(not_annotated(id.raw()));
        };

        if let [only] = elements {
            if matches!(arena.kind(*only), PatternKind::Rest(None)) {
                return Ok(true);
            }
        }

        let rest = elements
            .iter()
            .position(|&e| matches!(arena.kind(e), PatternKind::Rest(_)));
        let head = rest.unwrap_or(elements.len());
        let tail = rest.map_or(0, |r| elements.len() - r - 1);

        let host = &mut *self.host;
        let length = ctx
            .cache
            .get_or_compute(*length_path, || host.length(value).map(Value::Int))?
            .as_int()
            .unwrap_or(0);
        let required = count(head + tail);
        let fits = if elements.is_empty() {
            length <= 0
        } else if rest.is_some() {
            length >= required
        } else {
            length == required
        };
        if !fits {
            trace!(length, required, "list length refuted");
            return Ok(false);
        }
        let length = usize::try_from(length).unwrap_or(0);

        for (i, (&element, &path)) in elements.iter().zip(paths).enumerate() {
            if Some(i) == rest {
                let PatternKind::Rest(Some(inner)) = arena.kind(element) else {
                    continue;
                };
                let host = &mut *self.host;
                let sublist = ctx
                    .cache
                    .get_or_compute(path, || host.sublist(value, head, length - tail))?;
                if !self.match_node(*inner, &sublist, ctx)? {
                    return Ok(false);
                }
                continue;
            }
            if arena.get(element).is_untyped_wildcard() {
                continue;
            }
            let index = if i < head {
                i
            } else {
                length - (elements.len() - i)
            };
            let host = &mut *self.host;
            let item = ctx.cache.get_or_compute(path, || host.index(value, index))?;
            if !self.match_node(element, &item, ctx)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// `{k1: p1, ...}`
    ///
    /// A `null` lookup result is ambiguous only when the value type admits
    /// `null`; only then is key presence asked for.
    pub(super) fn match_map(
        &mut self,
        id: PatternId,
        entries: &[MapEntry],
        value: &Value,
        ctx: &mut MatchContext,
    ) -> EvalResult<bool> {
        if !self.type_test(id, value)? {
            return Ok(false);
        }
        let typed = self.program.typed;
        let plan = self.program.plan;
        let Some(NodePlan {
            access: NodeAccess::Map(accesses),
            ..
        }) = plan.node(id)
        else {
            return Err(not_annotated(id.raw()));
        };
        let keys = typed.map_keys(id).ok_or_else(|| not_annotated(id.raw()))?;

        let value_type = typed
            .required_type(id)
            .and_then(|ty| self.pool.map_types(ty))
            .map(|(_, v)| v);
        let may_hold_null = !self.config.sound_null_safety
            || value_type.map_or(true, |v| v.is_top() || self.pool.is_nullable(v));

        for ((entry, access), &key) in entries.iter().zip(accesses).zip(keys) {
            let key = Value::from_const(key, self.strings);
            let host = &mut *self.host;
            let found = ctx
                .cache
                .get_or_compute(access.lookup, || host.lookup(value, &key))?;
            if found.is_null() {
                if !may_hold_null {
                    trace!(%key, "map key absent");
                    return Ok(false);
                }
                let host = &mut *self.host;
                let present = ctx.cache.get_or_compute(access.contains, || {
                    host.contains_key(value, &key).map(Value::Bool)
                })?;
                if !matches!(present, Value::Bool(true)) {
                    trace!(%key, "map key absent");
                    return Ok(false);
                }
            }
            if !self.match_node(entry.value, &found, ctx)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// `(p1, name: p2, ...)`; fields are read directly, never through a
    /// getter.
    pub(super) fn match_record(
        &mut self,
        id: PatternId,
        fields: &[RecordField],
        value: &Value,
        ctx: &mut MatchContext,
    ) -> EvalResult<bool> {
        if !self.type_test(id, value)? {
            return Ok(false);
        }
        let plan = self.program.plan;
        let Some(NodePlan {
            access: NodeAccess::Fields(paths),
            ..
        }) = plan.node(id)
        else {
            return Err(not_annotated(id.raw()));
        };
        let Value::Record(record) = value else {
            return Err(member_not_found("record fields", value.kind_name()));
        };
        let strings = self.strings;

        let mut positional = 0;
        for (field, &path) in fields.iter().zip(paths) {
            let index = positional;
            if field.name.is_none() {
                positional += 1;
            }
            let field_value = ctx.cache.get_or_compute(path, || {
                record_field(record, field.name, index)
                    .cloned()
                    .ok_or_else(|| match field.name {
                        Some(name) => member_not_found(strings.lookup(name), "Record"),
                        None => member_not_found(&format!("${}", index + 1), "Record"),
                    })
            })?;
            if !self.match_node(field.pattern, &field_value, ctx)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// `T(name: p, ...)`
    ///
    /// Every getter is invoked, even one whose subpattern is a wildcard, in
    /// source order.
    pub(super) fn match_object(
        &mut self,
        id: PatternId,
        fields: &[ObjectField],
        value: &Value,
        ctx: &mut MatchContext,
    ) -> EvalResult<bool> {
        if !self.type_test(id, value)? {
            return Ok(false);
        }
        let typed = self.program.typed;
        let plan = self.program.plan;
        let Some(NodePlan {
            access: NodeAccess::Fields(paths),
            ..
        }) = plan.node(id)
        else {
            return Err(not_annotated(id.raw()));
        };

        for (i, (field, &path)) in fields.iter().zip(paths).enumerate() {
            let getter = typed.getter(id, i).ok_or_else(|| not_annotated(id.raw()))?;
            let host = &mut *self.host;
            let field_value = ctx.cache.get_or_compute(path, || host.get(value, getter))?;
            if !self.match_node(field.pattern, &field_value, ctx)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn record_field(record: &RecordValue, name: Option<Name>, index: usize) -> Option<&Value> {
    match name {
        Some(name) => record.named_field(name),
        None => record.positional.get(index),
    }
}
