//! Pattern trees.
//!
//! Patterns are stored flat in a [`PatternArena`] and refer to their children
//! by [`PatternId`]. A tree is immutable once built; the type checker and the
//! matcher keep their per-node results in side tables keyed by `PatternId`,
//! which doubles as the node's stable identity.

mod build;

use std::fmt;

use crate::{ConstId, Name, ParsedType, RelationalOp, Span};

/// Index of a pattern node in a [`PatternArena`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct PatternId(u32);

impl PatternId {
    /// Sentinel for "no pattern".
    pub const INVALID: PatternId = PatternId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        PatternId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

crate::static_assert_size!(PatternId, 4);

/// A contiguous run of child ids in the arena's list storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct PatternRange {
    pub start: u32,
    pub len: u32,
}

impl PatternRange {
    pub const EMPTY: PatternRange = PatternRange { start: 0, len: 0 };

    #[inline]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

crate::static_assert_size!(PatternRange, 8);

/// `(name: pattern)` or a positional `(pattern)` field of a record pattern.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct RecordField {
    pub name: Option<Name>,
    pub pattern: PatternId,
}

/// `key: pattern` entry of a map pattern. The key must be constant.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MapEntry {
    pub key: ConstId,
    pub value: PatternId,
}

/// `getter: pattern` field of an object pattern.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ObjectField {
    pub name: Name,
    pub pattern: PatternId,
}

/// Pattern node kind.
///
/// Fields and entries use `Vec` because each element pairs a name or key
/// with a subpattern; flattening them into a `PatternRange` would lose the
/// association.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum PatternKind {
    /// `p1 || p2`
    LogicalOr { left: PatternId, right: PatternId },
    /// `p1 && p2`
    LogicalAnd { left: PatternId, right: PatternId },
    /// `== c`, `< c`, ...
    Relational { op: RelationalOp, operand: ConstId },
    /// `p as T`
    Cast { pattern: PatternId, ty: ParsedType },
    /// `p?`
    NullCheck(PatternId),
    /// `p!`
    NullAssert(PatternId),
    /// `42`, `"s"`, `Color.red`
    Constant(ConstId),
    /// `var x`, `final int x`, `String s`, `int _`
    Variable {
        name: Name,
        ty: Option<ParsedType>,
        is_final: bool,
    },
    /// A bare identifier; its meaning depends on the pattern mode.
    Identifier(Name),
    /// `(p)`
    Parenthesized(PatternId),
    /// `<T>[p1, ...rest, p2]`
    List {
        type_arg: Option<ParsedType>,
        elements: PatternRange,
    },
    /// `...` or `...p`; only legal as a list element.
    Rest(Option<PatternId>),
    /// `<K, V>{k1: p1, k2: p2}`
    Map {
        type_args: Option<(ParsedType, ParsedType)>,
        entries: Vec<MapEntry>,
    },
    /// `(p1, name: p2)`
    Record(Vec<RecordField>),
    /// `Point(x: p1, y: p2)`
    Object {
        ty: ParsedType,
        fields: Vec<ObjectField>,
    },
}

impl PatternKind {
    /// Kinds that can fail for a value of the right type and so have no
    /// meaning in a declaration or assignment.
    #[inline]
    pub fn is_refutable_only(&self) -> bool {
        matches!(
            self,
            PatternKind::LogicalOr { .. }
                | PatternKind::Relational { .. }
                | PatternKind::NullCheck(_)
                | PatternKind::Constant(_)
        )
    }

    /// Short name for diagnostics and traces.
    pub fn describe(&self) -> &'static str {
        match self {
            PatternKind::LogicalOr { .. } => "logical-or pattern",
            PatternKind::LogicalAnd { .. } => "logical-and pattern",
            PatternKind::Relational { .. } => "relational pattern",
            PatternKind::Cast { .. } => "cast pattern",
            PatternKind::NullCheck(_) => "null-check pattern",
            PatternKind::NullAssert(_) => "null-assert pattern",
            PatternKind::Constant(_) => "constant pattern",
            PatternKind::Variable { .. } => "variable pattern",
            PatternKind::Identifier(_) => "identifier pattern",
            PatternKind::Parenthesized(_) => "parenthesized pattern",
            PatternKind::List { .. } => "list pattern",
            PatternKind::Rest(_) => "rest element",
            PatternKind::Map { .. } => "map pattern",
            PatternKind::Record(_) => "record pattern",
            PatternKind::Object { .. } => "object pattern",
        }
    }
}

/// A pattern node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

impl Pattern {
    /// `_`, `var _`, `final _`: matches without a type test and binds nothing.
    ///
    /// A typed wildcard (`int _`) still tests its type, so it is not
    /// included here.
    pub fn is_untyped_wildcard(&self) -> bool {
        match &self.kind {
            PatternKind::Variable { name, ty, .. } => name.is_wildcard() && ty.is_none(),
            PatternKind::Identifier(name) => name.is_wildcard(),
            _ => false,
        }
    }
}

/// Flat storage for pattern trees.
///
/// Several trees (the cases of one switch) usually share an arena.
#[derive(Clone, Default, Debug)]
pub struct PatternArena {
    patterns: Vec<Pattern>,
    lists: Vec<PatternId>,
}

/// A [`PatternArena`] ran out of 32-bit indices.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ArenaOverflow {
    /// No id is left for another node.
    Patterns,
    /// A child list of `len` entries does not fit in list storage.
    ListEntries { len: usize },
}

impl fmt::Display for ArenaOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaOverflow::Patterns => f.write_str("pattern arena is out of node ids"),
            ArenaOverflow::ListEntries { len } => {
                write!(f, "pattern arena has no room for a list of {len} children")
            }
        }
    }
}

impl std::error::Error for ArenaOverflow {}

impl PatternArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a pattern node, failing once ids no longer fit in `u32`.
    pub fn try_alloc(
        &mut self,
        kind: PatternKind,
        span: Span,
    ) -> Result<PatternId, ArenaOverflow> {
        let id = u32::try_from(self.patterns.len())
            .ok()
            .filter(|&id| id != PatternId::INVALID.raw())
            .ok_or(ArenaOverflow::Patterns)?;
        self.patterns.push(Pattern { kind, span });
        Ok(PatternId::new(id))
    }

    /// # Panics
    /// When the arena is full; see [`PatternArena::try_alloc`].
    #[inline]
    pub fn alloc(&mut self, kind: PatternKind, span: Span) -> PatternId {
        self.try_alloc(kind, span).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Store a list of children and return its range.
    pub fn try_alloc_list(&mut self, ids: &[PatternId]) -> Result<PatternRange, ArenaOverflow> {
        let overflow = ArenaOverflow::ListEntries { len: ids.len() };
        let start = u32::try_from(self.lists.len()).map_err(|_| overflow)?;
        let len = u32::try_from(ids.len()).map_err(|_| overflow)?;
        start.checked_add(len).ok_or(overflow)?;
        self.lists.extend_from_slice(ids);
        Ok(PatternRange { start, len })
    }

    /// # Panics
    /// When list storage is full; see [`PatternArena::try_alloc_list`].
    #[inline]
    pub fn alloc_list(&mut self, ids: &[PatternId]) -> PatternRange {
        self.try_alloc_list(ids).unwrap_or_else(|e| panic!("{e}"))
    }

    #[inline]
    pub fn get(&self, id: PatternId) -> &Pattern {
        &self.patterns[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: PatternId) -> &PatternKind {
        &self.patterns[id.index()].kind
    }

    #[inline]
    pub fn span(&self, id: PatternId) -> Span {
        self.patterns[id.index()].span
    }

    #[inline]
    pub fn list(&self, range: PatternRange) -> &[PatternId] {
        let start = range.start as usize;
        &self.lists[start..start + range.len()]
    }

    /// Direct subpatterns in source order.
    pub fn children(&self, id: PatternId) -> Vec<PatternId> {
        match self.kind(id) {
            PatternKind::LogicalOr { left, right } | PatternKind::LogicalAnd { left, right } => {
                vec![*left, *right]
            }
            PatternKind::Cast { pattern, .. }
            | PatternKind::NullCheck(pattern)
            | PatternKind::NullAssert(pattern)
            | PatternKind::Parenthesized(pattern)
            | PatternKind::Rest(Some(pattern)) => vec![*pattern],
            PatternKind::List { elements, .. } => self.list(*elements).to_vec(),
            PatternKind::Map { entries, .. } => entries.iter().map(|e| e.value).collect(),
            PatternKind::Record(fields) => fields.iter().map(|f| f.pattern).collect(),
            PatternKind::Object { fields, .. } => fields.iter().map(|f| f.pattern).collect(),
            PatternKind::Relational { .. }
            | PatternKind::Constant(_)
            | PatternKind::Variable { .. }
            | PatternKind::Identifier(_)
            | PatternKind::Rest(None) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
