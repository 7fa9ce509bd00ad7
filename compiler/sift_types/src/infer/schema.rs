//! Phase 1: context type schemas.

use sift_ir::{PatternId, PatternKind, PatternMode};
use sift_stack::ensure_sufficient_stack;

use super::{AnnotationRole, TypeInferencer};
use crate::{EnvEntry, Idx, TypeErrorKind, TypeOracle};

impl<O: TypeOracle + ?Sized> TypeInferencer<'_, O> {
    /// Compute and record the context type schema of `id` and its subtree.
    pub fn schema(&mut self, id: PatternId) -> Idx {
        ensure_sufficient_stack(|| self.schema_inner(id))
    }

    fn schema_inner(&mut self, id: PatternId) -> Idx {
        let arena = self.arena;
        let pattern = arena.get(id);

        // Only the outermost refutable node of an irrefutable pattern is reported.
        let illegal = pattern.kind.is_refutable_only()
            && self.mode.is_irrefutable()
            && !self.in_refutable;
        if illegal {
            self.error(
                pattern.span,
                TypeErrorKind::RefutableInIrrefutable {
                    kind: pattern.kind.describe(),
                },
            );
            self.in_refutable = true;
        }

        let schema = match &pattern.kind {
            PatternKind::LogicalOr { left, right } => {
                self.schema(*left);
                self.schema(*right);
                Idx::HOLE
            }
            PatternKind::LogicalAnd { left, right } => {
                let left = self.schema(*left);
                let right = self.schema(*right);
                self.oracle.glb(self.pool, left, right)
            }
            PatternKind::Relational { .. } | PatternKind::Constant(_) => Idx::HOLE,
            PatternKind::NullCheck(inner) | PatternKind::NullAssert(inner) => {
                let inner = self.schema(*inner);
                self.pool.nullable(inner)
            }
            PatternKind::Cast { pattern, .. } => {
                self.schema(*pattern);
                Idx::HOLE
            }
            PatternKind::Variable { ty: Some(ty), .. } => {
                self.resolve_annotation(id, AnnotationRole::Type, ty)
            }
            PatternKind::Variable { ty: None, .. } => Idx::HOLE,
            PatternKind::Identifier(name) => match (self.mode, self.env.lookup(*name)) {
                (PatternMode::Assignment, Some(EnvEntry::Variable { ty, .. })) => ty,
                _ => Idx::HOLE,
            },
            PatternKind::Parenthesized(inner) => self.schema(*inner),
            PatternKind::Rest(inner) => match inner {
                Some(inner) => self.schema(*inner),
                None => Idx::HOLE,
            },
            PatternKind::List { type_arg, elements } => {
                let mut elem = Idx::HOLE;
                for &element in arena.list(*elements) {
                    let schema = self.schema(element);
                    let contributes = if matches!(arena.kind(element), PatternKind::Rest(_)) {
                        self.pool.list_elem(schema).unwrap_or(Idx::HOLE)
                    } else {
                        schema
                    };
                    elem = self.oracle.glb(self.pool, elem, contributes);
                }
                if let Some(ty) = type_arg {
                    elem = self.resolve_annotation(id, AnnotationRole::Type, ty);
                }
                self.pool.list(elem)
            }
            PatternKind::Map { type_args, entries } => {
                let mut value = Idx::HOLE;
                for entry in entries {
                    let schema = self.schema(entry.value);
                    value = self.oracle.glb(self.pool, value, schema);
                }
                match type_args {
                    Some((key_ty, value_ty)) => {
                        let key = self.resolve_annotation(id, AnnotationRole::MapKey, key_ty);
                        let value = self.resolve_annotation(id, AnnotationRole::MapValue, value_ty);
                        self.pool.map(key, value)
                    }
                    None => self.pool.map(Idx::HOLE, value),
                }
            }
            PatternKind::Record(fields) => {
                let mut positional = Vec::new();
                let mut named = Vec::new();
                for field in fields {
                    let schema = self.schema(field.pattern);
                    match field.name {
                        Some(name) => named.push((name, schema)),
                        None => positional.push(schema),
                    }
                }
                self.pool.record(&positional, &named)
            }
            PatternKind::Object { ty, fields } => {
                for field in fields {
                    self.schema(field.pattern);
                }
                match self.inferred_class(ty) {
                    Some((class, count)) => self
                        .oracle
                        .instantiate(self.pool, class, &vec![Idx::HOLE; count])
                        .unwrap_or(Idx::ERROR),
                    None => self.resolve_annotation(id, AnnotationRole::Type, ty),
                }
            }
        };

        if illegal {
            self.in_refutable = false;
        }
        let written = self.typed.set_schema(id, schema);
        self.record(pattern.span, written);
        schema
    }
}
