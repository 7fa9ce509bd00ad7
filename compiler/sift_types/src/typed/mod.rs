//! Per-node typing results.
//!
//! Pattern trees are immutable, so everything the inferencer learns about a
//! node is recorded here, keyed by `PatternId`. Every slot is write-once:
//! writing a slot a second time is an internal error, even when the value
//! is the same, because it means a node was checked twice.

use sift_ir::{ConstValue, IdentifierResolution, PatternId};

use crate::{GetterRef, Idx, OperatorRef};

/// Names the annotation a write targeted.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AnnotationSlot {
    Schema,
    Matched,
    Required,
    Guaranteed,
    ImplicitCast,
    Identifier,
    Constant,
    MapKeys,
    Getters,
    Operator,
}

impl AnnotationSlot {
    pub const fn as_str(self) -> &'static str {
        match self {
            AnnotationSlot::Schema => "context type schema",
            AnnotationSlot::Matched => "matched value type",
            AnnotationSlot::Required => "required type",
            AnnotationSlot::Guaranteed => "static type guarantee",
            AnnotationSlot::ImplicitCast => "implicit cast",
            AnnotationSlot::Identifier => "identifier resolution",
            AnnotationSlot::Constant => "constant value",
            AnnotationSlot::MapKeys => "map keys",
            AnnotationSlot::Getters => "resolved getters",
            AnnotationSlot::Operator => "resolved operator",
        }
    }
}

/// A second write to an annotation slot.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct AnnotationConflict {
    pub pattern: PatternId,
    pub slot: AnnotationSlot,
}

/// One write-once column indexed by `PatternId`.
#[derive(Clone, Debug)]
struct Column<T> {
    slot: AnnotationSlot,
    values: Vec<Option<T>>,
}

impl<T> Column<T> {
    fn new(slot: AnnotationSlot) -> Self {
        Column {
            slot,
            values: Vec::new(),
        }
    }

    fn set(&mut self, id: PatternId, value: T) -> Result<(), AnnotationConflict> {
        let index = id.index();
        if index >= self.values.len() {
            self.values.resize_with(index + 1, || None);
        }
        let cell = &mut self.values[index];
        if cell.is_some() {
            return Err(AnnotationConflict {
                pattern: id,
                slot: self.slot,
            });
        }
        *cell = Some(value);
        Ok(())
    }

    fn get(&self, id: PatternId) -> Option<&T> {
        self.values.get(id.index()).and_then(Option::as_ref)
    }
}

/// Typing results for the nodes of one or more pattern trees.
#[derive(Clone, Debug)]
pub struct TypedPatterns {
    schema: Column<Idx>,
    matched: Column<Idx>,
    required: Column<Idx>,
    guaranteed: Column<bool>,
    implicit_cast: Column<bool>,
    identifiers: Column<IdentifierResolution>,
    constants: Column<ConstValue>,
    map_keys: Column<Vec<ConstValue>>,
    getters: Column<Vec<Option<GetterRef>>>,
    operators: Column<OperatorRef>,
}

impl TypedPatterns {
    pub fn new() -> Self {
        TypedPatterns {
            schema: Column::new(AnnotationSlot::Schema),
            matched: Column::new(AnnotationSlot::Matched),
            required: Column::new(AnnotationSlot::Required),
            guaranteed: Column::new(AnnotationSlot::Guaranteed),
            implicit_cast: Column::new(AnnotationSlot::ImplicitCast),
            identifiers: Column::new(AnnotationSlot::Identifier),
            constants: Column::new(AnnotationSlot::Constant),
            map_keys: Column::new(AnnotationSlot::MapKeys),
            getters: Column::new(AnnotationSlot::Getters),
            operators: Column::new(AnnotationSlot::Operator),
        }
    }

    // === Readers ===

    /// Context type schema computed in the first inference phase.
    pub fn schema(&self, id: PatternId) -> Option<Idx> {
        self.schema.get(id).copied()
    }

    /// Static type of the value this node is matched against.
    pub fn matched_type(&self, id: PatternId) -> Option<Idx> {
        self.matched.get(id).copied()
    }

    /// Type the node requires of its value.
    pub fn required_type(&self, id: PatternId) -> Option<Idx> {
        self.required.get(id).copied()
    }

    /// The matched type is statically a subtype of the required type.
    pub fn is_guaranteed(&self, id: PatternId) -> bool {
        self.guaranteed.get(id).copied().unwrap_or(false)
    }

    /// A `dynamic` value flows into an irrefutable node and must be cast.
    pub fn needs_implicit_cast(&self, id: PatternId) -> bool {
        self.implicit_cast.get(id).copied().unwrap_or(false)
    }

    pub fn identifier(&self, id: PatternId) -> Option<IdentifierResolution> {
        self.identifiers.get(id).copied()
    }

    /// Value of a constant, relational operand or constant identifier.
    pub fn constant(&self, id: PatternId) -> Option<ConstValue> {
        self.constants.get(id).copied()
    }

    /// Evaluated keys of a map pattern, in entry order.
    pub fn map_keys(&self, id: PatternId) -> Option<&[ConstValue]> {
        self.map_keys.get(id).map(Vec::as_slice)
    }

    /// Getter resolved for field `field` of an object pattern.
    pub fn getter(&self, id: PatternId, field: usize) -> Option<&GetterRef> {
        self.getters
            .get(id)
            .and_then(|fields| fields.get(field))
            .and_then(Option::as_ref)
    }

    /// Operator resolved for a relational pattern.
    pub fn operator(&self, id: PatternId) -> Option<&OperatorRef> {
        self.operators.get(id)
    }

    /// Whether the check pass reached this node.
    pub fn is_annotated(&self, id: PatternId) -> bool {
        self.required.get(id).is_some()
    }

    // === Writers ===

    pub(crate) fn set_schema(&mut self, id: PatternId, ty: Idx) -> Result<(), AnnotationConflict> {
        self.schema.set(id, ty)
    }

    pub(crate) fn set_matched(&mut self, id: PatternId, ty: Idx) -> Result<(), AnnotationConflict> {
        self.matched.set(id, ty)
    }

    pub(crate) fn set_required(&mut self, id: PatternId, ty: Idx) -> Result<(), AnnotationConflict> {
        self.required.set(id, ty)
    }

    pub(crate) fn set_guaranteed(
        &mut self,
        id: PatternId,
        guaranteed: bool,
    ) -> Result<(), AnnotationConflict> {
        self.guaranteed.set(id, guaranteed)
    }

    pub(crate) fn set_implicit_cast(&mut self, id: PatternId) -> Result<(), AnnotationConflict> {
        self.implicit_cast.set(id, true)
    }

    pub(crate) fn set_identifier(
        &mut self,
        id: PatternId,
        resolution: IdentifierResolution,
    ) -> Result<(), AnnotationConflict> {
        self.identifiers.set(id, resolution)
    }

    pub(crate) fn set_constant(
        &mut self,
        id: PatternId,
        value: ConstValue,
    ) -> Result<(), AnnotationConflict> {
        self.constants.set(id, value)
    }

    pub(crate) fn set_map_keys(
        &mut self,
        id: PatternId,
        keys: Vec<ConstValue>,
    ) -> Result<(), AnnotationConflict> {
        self.map_keys.set(id, keys)
    }

    pub(crate) fn set_getters(
        &mut self,
        id: PatternId,
        getters: Vec<Option<GetterRef>>,
    ) -> Result<(), AnnotationConflict> {
        self.getters.set(id, getters)
    }

    pub(crate) fn set_operator(
        &mut self,
        id: PatternId,
        op: OperatorRef,
    ) -> Result<(), AnnotationConflict> {
        self.operators.set(id, op)
    }
}

impl Default for TypedPatterns {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
