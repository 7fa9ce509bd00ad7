//! Phase 3: required types.

use sift_ir::{
    ConstId, IdentifierResolution, MapEntry, Name, ObjectField, ParsedType, PatternId,
    PatternKind, PatternMode, PatternRange, RecordField, RelationalOp, Span,
};
use sift_stack::ensure_sufficient_stack;
use tracing::{debug, trace};

use super::{AnnotationRole, TypeInferencer};
use crate::{EnvEntry, Idx, TypeErrorKind, TypeOracle};

impl<O: TypeOracle + ?Sized> TypeInferencer<'_, O> {
    /// Check `id` against a value of static type `matched`, recording the
    /// node's required type, and return it.
    pub fn check(&mut self, id: PatternId, matched: Idx) -> Idx {
        ensure_sufficient_stack(|| self.check_inner(id, matched))
    }

    fn check_inner(&mut self, id: PatternId, m: Idx) -> Idx {
        let arena = self.arena;
        let pattern = arena.get(id);
        let span = pattern.span;

        let required = match &pattern.kind {
            PatternKind::LogicalOr { left, right } => {
                self.check(*left, m);
                self.check(*right, m);
                Idx::OBJECT_Q
            }
            PatternKind::LogicalAnd { left, right } => {
                let left = self.check(*left, m);
                let narrowed = self.oracle.glb(self.pool, m, left);
                self.check(*right, narrowed);
                Idx::OBJECT_Q
            }
            PatternKind::Relational { op, operand } => {
                self.check_relational(id, span, *op, *operand, m);
                Idx::OBJECT_Q
            }
            PatternKind::Cast { pattern, ty } => {
                let cast = self.resolve_annotation(id, AnnotationRole::Type, ty);
                self.check(*pattern, cast);
                Idx::OBJECT_Q
            }
            PatternKind::NullCheck(inner) | PatternKind::NullAssert(inner) => {
                let non_null = self.pool.non_null(m);
                self.check(*inner, non_null);
                Idx::OBJECT_Q
            }
            PatternKind::Constant(constant) => {
                if let Some((value, ty)) = self.const_value(*constant) {
                    let written = self.typed.set_constant(id, value);
                    self.record(span, written);
                    self.warn_if_never_matches(span, ty, m);
                }
                Idx::OBJECT_Q
            }
            PatternKind::Variable { name, ty, .. } => {
                if self.mode == PatternMode::Assignment && !name.is_wildcard() {
                    self.error(span, TypeErrorKind::DeclarationInAssignment { name: *name });
                }
                let required = match ty {
                    Some(ty) => self.resolve_annotation(id, AnnotationRole::Type, ty),
                    None => m,
                };
                self.check_assignable(id, span, m, required);
                required
            }
            PatternKind::Identifier(name) => self.check_identifier(id, span, *name, m),
            PatternKind::Parenthesized(inner) => self.check(*inner, m),
            PatternKind::Rest(inner) => {
                self.error(span, TypeErrorKind::RestOutsideList);
                if let Some(inner) = inner {
                    self.check(*inner, m);
                }
                Idx::OBJECT_Q
            }
            PatternKind::List { type_arg, elements } => {
                self.check_list(id, span, type_arg.as_ref(), *elements, m)
            }
            PatternKind::Map { type_args, entries } => {
                self.check_map(id, span, type_args.as_ref(), entries, m)
            }
            PatternKind::Record(fields) => self.check_record(id, span, fields, m),
            PatternKind::Object { ty, fields } => self.check_object(id, span, ty, fields, m),
        };

        self.finish(id, span, m, required)
    }

    /// Record the node's matched and required types.
    fn finish(&mut self, id: PatternId, span: Span, m: Idx, required: Idx) -> Idx {
        let guaranteed = self.oracle.is_subtype(self.pool, m, required);
        trace!(pattern = id.raw(), ?m, ?required, guaranteed, "checked");
        let written = self.typed.set_matched(id, m);
        self.record(span, written);
        let written = self.typed.set_required(id, required);
        self.record(span, written);
        let written = self.typed.set_guaranteed(id, guaranteed);
        self.record(span, written);
        required
    }

    /// In a declaration or assignment the value must have the required type,
    /// unless it is `dynamic`, which gets an implicit (fallible) cast.
    fn check_assignable(&mut self, id: PatternId, span: Span, m: Idx, required: Idx) {
        if !self.mode.is_irrefutable() || m.is_error() || required.is_error() {
            return;
        }
        if self.oracle.is_subtype(self.pool, m, required) {
            return;
        }
        if m.is_dynamic() {
            debug!(pattern = id.raw(), ?required, "implicit cast from dynamic");
            let written = self.typed.set_implicit_cast(id);
            self.record(span, written);
        } else {
            self.error(
                span,
                TypeErrorKind::NotAssignable {
                    expected: required,
                    found: m,
                },
            );
        }
    }

    /// Warn about a constant whose type is unrelated to the matched type.
    fn warn_if_never_matches(&mut self, span: Span, constant: Idx, m: Idx) {
        if m.is_top() || constant.is_error() {
            return;
        }
        let related = self.oracle.is_subtype(self.pool, constant, m)
            || self.oracle.is_subtype(self.pool, m, constant);
        if !related {
            self.error(
                span,
                TypeErrorKind::ConstantNeverMatches {
                    constant,
                    matched: m,
                },
            );
        }
    }

    /// Element type used when the pattern does not say and `M` does not tell.
    fn fallback(m: Idx) -> Idx {
        if m.is_dynamic() || m.is_error() {
            m
        } else {
            Idx::OBJECT_Q
        }
    }

    fn check_relational(
        &mut self,
        id: PatternId,
        span: Span,
        op: RelationalOp,
        operand: ConstId,
        m: Idx,
    ) {
        let value = self.const_value(operand);
        if let Some((value, _)) = value {
            let written = self.typed.set_constant(id, value);
            self.record(span, written);
        }
        let receiver = self.pool.non_null(m);
        let Some(resolved) = self.oracle.lookup_operator(self.pool, receiver, op) else {
            self.error(span, TypeErrorKind::UndefinedOperator { receiver: m, op });
            return;
        };
        if !resolved.ret.is_dynamic() && !self.oracle.is_subtype(self.pool, resolved.ret, Idx::BOOL)
        {
            self.error(
                span,
                TypeErrorKind::NonBoolOperator {
                    op,
                    ret: resolved.ret,
                },
            );
        }
        if let Some((_, ty)) = value {
            if !self.oracle.is_subtype(self.pool, ty, resolved.operand) && !ty.is_error() {
                let operand_span = self.consts.span(operand);
                self.error(
                    operand_span,
                    TypeErrorKind::NotAssignable {
                        expected: resolved.operand,
                        found: ty,
                    },
                );
            }
        }
        let written = self.typed.set_operator(id, resolved);
        self.record(span, written);
    }

    fn check_identifier(&mut self, id: PatternId, span: Span, name: Name, m: Idx) -> Idx {
        let (resolution, required) = if name.is_wildcard() {
            (IdentifierResolution::Wildcard, m)
        } else {
            match self.mode {
                PatternMode::Declaration { .. } => (IdentifierResolution::Declare, m),
                PatternMode::Assignment => {
                    let required = match self.env.lookup(name) {
                        Some(EnvEntry::Variable { ty, is_final }) => {
                            if is_final {
                                self.error(span, TypeErrorKind::AssignToFinal { name });
                            }
                            ty
                        }
                        Some(EnvEntry::Constant { ty, .. }) => {
                            self.error(span, TypeErrorKind::AssignToFinal { name });
                            ty
                        }
                        None => {
                            self.error(span, TypeErrorKind::AssignToUndeclared { name });
                            Idx::ERROR
                        }
                    };
                    self.check_assignable(id, span, m, required);
                    (IdentifierResolution::Assign, required)
                }
                PatternMode::Matching => {
                    if let Some((value, ty)) = self.resolve_constant_name(span, name) {
                        let written = self.typed.set_constant(id, value);
                        self.record(span, written);
                        self.warn_if_never_matches(span, ty, m);
                    }
                    (IdentifierResolution::Constant, Idx::OBJECT_Q)
                }
            }
        };
        let written = self.typed.set_identifier(id, resolution);
        self.record(span, written);
        required
    }

    fn check_list(
        &mut self,
        id: PatternId,
        span: Span,
        type_arg: Option<&ParsedType>,
        elements: PatternRange,
        m: Idx,
    ) -> Idx {
        let elem = match type_arg {
            Some(ty) => self.resolve_annotation(id, AnnotationRole::Type, ty),
            None => {
                let receiver = self.pool.non_null(m);
                self.oracle
                    .as_list(self.pool, receiver)
                    .unwrap_or_else(|| Self::fallback(m))
            }
        };
        let required = self.pool.list(elem);

        let arena = self.arena;
        let mut seen_rest = false;
        for &element in arena.list(elements) {
            if let PatternKind::Rest(inner) = arena.kind(element) {
                let element_span = arena.span(element);
                if seen_rest {
                    self.error(element_span, TypeErrorKind::MultipleRestElements);
                }
                seen_rest = true;
                if let Some(inner) = inner {
                    self.check(*inner, required);
                }
                self.finish(element, element_span, required, required);
            } else {
                self.check(element, elem);
            }
        }

        self.check_assignable(id, span, m, required);
        required
    }

    fn check_map(
        &mut self,
        id: PatternId,
        span: Span,
        type_args: Option<&(ParsedType, ParsedType)>,
        entries: &[MapEntry],
        m: Idx,
    ) -> Idx {
        let (key, value) = match type_args {
            Some((key_ty, value_ty)) => (
                self.resolve_annotation(id, AnnotationRole::MapKey, key_ty),
                self.resolve_annotation(id, AnnotationRole::MapValue, value_ty),
            ),
            None => {
                let receiver = self.pool.non_null(m);
                self.oracle
                    .as_map(self.pool, receiver)
                    .unwrap_or_else(|| (Self::fallback(m), Self::fallback(m)))
            }
        };
        let required = self.pool.map(key, value);

        let mut keys = Vec::with_capacity(entries.len());
        let mut all_resolved = true;
        for entry in entries {
            let key_span = self.consts.span(entry.key);
            match self.const_value(entry.key) {
                Some((constant, ty)) => {
                    if !ty.is_error() && !self.oracle.is_subtype(self.pool, ty, key) {
                        self.error(
                            key_span,
                            TypeErrorKind::NotAssignable {
                                expected: key,
                                found: ty,
                            },
                        );
                    }
                    if keys.contains(&constant) {
                        self.error(key_span, TypeErrorKind::DuplicateMapKey { key: constant });
                    }
                    keys.push(constant);
                }
                None => all_resolved = false,
            }
            self.check(entry.value, value);
        }
        if all_resolved {
            let written = self.typed.set_map_keys(id, keys);
            self.record(span, written);
        }

        self.check_assignable(id, span, m, required);
        required
    }

    fn check_record(&mut self, id: PatternId, span: Span, fields: &[RecordField], m: Idx) -> Idx {
        let arena = self.arena;
        let mut names: Vec<Name> = Vec::new();
        for field in fields {
            if let Some(name) = field.name {
                if names.contains(&name) {
                    self.error(
                        arena.span(field.pattern),
                        TypeErrorKind::DuplicateRecordField { name },
                    );
                } else {
                    names.push(name);
                }
            }
        }
        let positional_count = fields.iter().filter(|f| f.name.is_none()).count();

        // Field types come from M only when M is a record of exactly this shape.
        let receiver = self.pool.non_null(m);
        let shape = self.pool.record_shape(receiver).filter(|shape| {
            shape.positional.len() == positional_count
                && shape.named.len() == names.len()
                && shape.named.iter().all(|(name, _)| names.contains(name))
        });
        let fallback = Self::fallback(m);

        let mut positional = Vec::with_capacity(positional_count);
        let mut named = Vec::with_capacity(names.len());
        for field in fields {
            let field_ty = match (field.name, &shape) {
                (None, Some(shape)) => shape
                    .positional
                    .get(positional.len())
                    .copied()
                    .unwrap_or(fallback),
                (Some(name), Some(shape)) => shape
                    .named
                    .iter()
                    .find_map(|&(n, ty)| (n == name).then_some(ty))
                    .unwrap_or(fallback),
                (_, None) => fallback,
            };
            self.check(field.pattern, field_ty);
            match field.name {
                Some(name) => {
                    if !named.iter().any(|&(n, _)| n == name) {
                        named.push((name, field_ty));
                    }
                }
                None => positional.push(field_ty),
            }
        }
        let required = self.pool.record(&positional, &named);

        self.check_assignable(id, span, m, required);
        required
    }

    fn check_object(
        &mut self,
        id: PatternId,
        span: Span,
        ty: &ParsedType,
        fields: &[ObjectField],
        m: Idx,
    ) -> Idx {
        let object = match self.inferred_class(ty) {
            Some((class, _)) => {
                let args = self.oracle.infer_type_arguments(self.pool, class, m);
                self.oracle
                    .instantiate(self.pool, class, &args)
                    .unwrap_or(Idx::ERROR)
            }
            None => self.resolve_annotation(id, AnnotationRole::Type, ty),
        };

        let arena = self.arena;
        let mut getters = Vec::with_capacity(fields.len());
        for field in fields {
            match self.oracle.lookup_getter(self.pool, object, field.name) {
                Some(getter) => {
                    self.check(field.pattern, getter.ty);
                    getters.push(Some(getter));
                }
                None => {
                    self.error(
                        arena.span(field.pattern),
                        TypeErrorKind::UnknownGetter {
                            receiver: object,
                            name: field.name,
                        },
                    );
                    self.check(field.pattern, Idx::ERROR);
                    getters.push(None);
                }
            }
        }
        let written = self.typed.set_getters(id, getters);
        self.record(span, written);

        self.check_assignable(id, span, m, object);
        object
    }
}
