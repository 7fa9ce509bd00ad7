//! Shorthand constructors for building trees without source text.
//!
//! Every node gets [`Span::DUMMY`]; use [`PatternArena::alloc`] directly when
//! spans matter.

use super::{MapEntry, ObjectField, PatternArena, PatternId, PatternKind, RecordField};
use crate::{ConstId, Name, ParsedType, RelationalOp, Span};

impl PatternArena {
    fn synth(&mut self, kind: PatternKind) -> PatternId {
        self.alloc(kind, Span::DUMMY)
    }

    /// `_`
    pub fn wildcard(&mut self) -> PatternId {
        self.synth(PatternKind::Identifier(Name::WILDCARD))
    }

    /// `var name`
    pub fn var(&mut self, name: Name) -> PatternId {
        self.synth(PatternKind::Variable {
            name,
            ty: None,
            is_final: false,
        })
    }

    /// `final name`
    pub fn final_var(&mut self, name: Name) -> PatternId {
        self.synth(PatternKind::Variable {
            name,
            ty: None,
            is_final: true,
        })
    }

    /// `T name`
    pub fn typed_var(&mut self, ty: ParsedType, name: Name) -> PatternId {
        self.synth(PatternKind::Variable {
            name,
            ty: Some(ty),
            is_final: false,
        })
    }

    /// Bare `name`.
    pub fn ident(&mut self, name: Name) -> PatternId {
        self.synth(PatternKind::Identifier(name))
    }

    pub fn constant(&mut self, value: ConstId) -> PatternId {
        self.synth(PatternKind::Constant(value))
    }

    pub fn relational(&mut self, op: RelationalOp, operand: ConstId) -> PatternId {
        self.synth(PatternKind::Relational { op, operand })
    }

    pub fn or(&mut self, left: PatternId, right: PatternId) -> PatternId {
        self.synth(PatternKind::LogicalOr { left, right })
    }

    pub fn and(&mut self, left: PatternId, right: PatternId) -> PatternId {
        self.synth(PatternKind::LogicalAnd { left, right })
    }

    pub fn cast(&mut self, pattern: PatternId, ty: ParsedType) -> PatternId {
        self.synth(PatternKind::Cast { pattern, ty })
    }

    pub fn null_check(&mut self, pattern: PatternId) -> PatternId {
        self.synth(PatternKind::NullCheck(pattern))
    }

    pub fn null_assert(&mut self, pattern: PatternId) -> PatternId {
        self.synth(PatternKind::NullAssert(pattern))
    }

    pub fn paren(&mut self, pattern: PatternId) -> PatternId {
        self.synth(PatternKind::Parenthesized(pattern))
    }

    /// `...` (no subpattern) or `...p`.
    pub fn rest(&mut self, pattern: Option<PatternId>) -> PatternId {
        self.synth(PatternKind::Rest(pattern))
    }

    pub fn list_pattern(&mut self, elements: &[PatternId]) -> PatternId {
        let elements = self.alloc_list(elements);
        self.synth(PatternKind::List {
            type_arg: None,
            elements,
        })
    }

    /// `<T>[...]`
    pub fn typed_list(&mut self, type_arg: ParsedType, elements: &[PatternId]) -> PatternId {
        let elements = self.alloc_list(elements);
        self.synth(PatternKind::List {
            type_arg: Some(type_arg),
            elements,
        })
    }

    pub fn map(&mut self, entries: &[(ConstId, PatternId)]) -> PatternId {
        self.map_with(None, entries)
    }

    /// `<K, V>{...}` when `type_args` is set.
    pub fn map_with(
        &mut self,
        type_args: Option<(ParsedType, ParsedType)>,
        entries: &[(ConstId, PatternId)],
    ) -> PatternId {
        let entries = entries
            .iter()
            .map(|&(key, value)| MapEntry { key, value })
            .collect();
        self.synth(PatternKind::Map { type_args, entries })
    }

    /// Positional fields have `None` names.
    pub fn record(&mut self, fields: &[(Option<Name>, PatternId)]) -> PatternId {
        let fields = fields
            .iter()
            .map(|&(name, pattern)| RecordField { name, pattern })
            .collect();
        self.synth(PatternKind::Record(fields))
    }

    pub fn object(&mut self, ty: ParsedType, fields: &[(Name, PatternId)]) -> PatternId {
        let fields = fields
            .iter()
            .map(|&(name, pattern)| ObjectField { name, pattern })
            .collect();
        self.synth(PatternKind::Object { ty, fields })
    }
}
