//! Access paths and the static pre-pass that assigns them to pattern nodes.
//!
//! An [`AccessPath`] names one member access on the subject structurally:
//! the path of the receiver, the member, the extension it resolved through
//! and its constant arguments. Two nodes that perform the same access get
//! the same [`PathId`], whichever case or sibling subpattern they sit in, so
//! the invocation cache can evaluate the access once per match attempt.
//!
//! Paths depend only on pattern shape and typing results, never on runtime
//! values, so a [`MatchPlan`] is built once per switch and reused for every
//! subject it is matched against.

use rustc_hash::FxHashMap;
use sift_ir::{
    ConstValue, IdentifierResolution, Name, PatternArena, PatternId, PatternKind, RelationalOp,
};
use sift_stack::ensure_sufficient_stack;
use sift_types::{ExtensionRef, TypedPatterns};
use smallvec::{smallvec, SmallVec};
use tracing::trace;

/// Interned [`AccessPath`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct PathId(u32);

impl PathId {
    /// The subject itself.
    pub const SUBJECT: PathId = PathId(0);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        PathId(raw)
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

/// The member an access path invokes on its parent.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Member {
    /// Root of every path.
    Subject,
    /// A getter of an object pattern.
    Getter(Name),
    /// Positional record field.
    Positional(u32),
    /// Named record field.
    Field(Name),
    /// `length` of a list.
    Length,
    /// `[i]`; the argument is negative when counted from the end.
    Index,
    /// Sublist between a head and a tail count.
    Sublist,
    /// `map[key]`
    Lookup,
    /// `map.containsKey(key)`
    ContainsKey,
    /// Relational operator; `!=` is keyed as `==`.
    Operator(RelationalOp),
    /// `constant == value`
    Equals,
}

/// Structural identity of a member access.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct AccessPath {
    pub parent: Option<PathId>,
    pub extension: Option<ExtensionRef>,
    pub member: Member,
    pub args: SmallVec<[ConstValue; 2]>,
}

impl AccessPath {
    fn subject() -> Self {
        AccessPath {
            parent: None,
            extension: None,
            member: Member::Subject,
            args: SmallVec::new(),
        }
    }

    fn child(parent: PathId, member: Member) -> Self {
        AccessPath {
            parent: Some(parent),
            extension: None,
            member,
            args: SmallVec::new(),
        }
    }
}

/// Accesses of a map entry.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct MapAccess {
    pub lookup: PathId,
    pub contains: PathId,
}

/// Member accesses a node performs on its value.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum NodeAccess {
    /// No access of its own (variables, casts, null checks, ...).
    Leaf,
    /// Relational operator or constant equality.
    Compare(PathId),
    /// Length, then one access per element in source order.
    List {
        length: PathId,
        elements: Vec<PathId>,
    },
    Map(Vec<MapAccess>),
    /// Record fields or object getters, in source order.
    Fields(Vec<PathId>),
}

/// The plan of one node.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct NodePlan {
    /// Path of the value the node is matched against.
    pub value: PathId,
    pub access: NodeAccess,
}

/// Access paths of every node of one or more pattern trees.
#[derive(Clone, Debug)]
pub struct MatchPlan {
    paths: Vec<AccessPath>,
    index: FxHashMap<AccessPath, PathId>,
    nodes: Vec<Option<NodePlan>>,
}

impl MatchPlan {
    /// Plan the trees rooted at `roots`, which all match the same subject.
    ///
    /// Nodes whose typing results are missing get no plan; matching them
    /// reports an internal error.
    #[tracing::instrument(level = "debug", skip_all, fields(roots = roots.len()))]
    pub fn build(arena: &PatternArena, typed: &TypedPatterns, roots: &[PatternId]) -> Self {
        let mut plan = MatchPlan {
            paths: Vec::new(),
            index: FxHashMap::default(),
            nodes: Vec::new(),
        };
        let subject = plan.intern(AccessPath::subject());
        debug_assert_eq!(subject, PathId::SUBJECT);
        let mut builder = PlanBuilder {
            arena,
            typed,
            plan: &mut plan,
        };
        for &root in roots {
            builder.visit(root, subject);
        }
        trace!(paths = plan.paths.len(), "plan built");
        plan
    }

    pub fn node(&self, id: PatternId) -> Option<&NodePlan> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn path(&self, id: PathId) -> &AccessPath {
        &self.paths[id.index()]
    }

    /// Number of distinct paths, the subject included.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    fn intern(&mut self, path: AccessPath) -> PathId {
        if let Some(&id) = self.index.get(&path) {
            return id;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "path counts are bounded by pattern node counts"
        )]
        let id = PathId(self.paths.len() as u32);
        self.paths.push(path.clone());
        self.index.insert(path, id);
        id
    }

    fn set(&mut self, id: PatternId, node: NodePlan) {
        let index = id.index();
        if index >= self.nodes.len() {
            self.nodes.resize_with(index + 1, || None);
        }
        self.nodes[index] = Some(node);
    }
}

struct PlanBuilder<'a> {
    arena: &'a PatternArena,
    typed: &'a TypedPatterns,
    plan: &'a mut MatchPlan,
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl PlanBuilder<'_> {
    fn visit(&mut self, id: PatternId, value: PathId) {
        ensure_sufficient_stack(|| self.visit_inner(id, value));
    }

    fn visit_inner(&mut self, id: PatternId, value: PathId) {
        let arena = self.arena;
        let typed = self.typed;
        let access = match arena.kind(id) {
            PatternKind::LogicalOr { left, right } | PatternKind::LogicalAnd { left, right } => {
                self.visit(*left, value);
                self.visit(*right, value);
                NodeAccess::Leaf
            }
            PatternKind::Cast { pattern: inner, .. }
            | PatternKind::NullCheck(inner)
            | PatternKind::NullAssert(inner)
            | PatternKind::Parenthesized(inner)
            | PatternKind::Rest(Some(inner)) => {
                self.visit(*inner, value);
                NodeAccess::Leaf
            }
            PatternKind::Rest(None) | PatternKind::Variable { .. } => NodeAccess::Leaf,
            PatternKind::Relational { op, .. } => {
                let (Some(constant), Some(operator)) = (typed.constant(id), typed.operator(id))
                else {
                    return;
                };
                let member = if op.is_equality() {
                    Member::Operator(RelationalOp::Eq)
                } else {
                    Member::Operator(*op)
                };
                let path = AccessPath {
                    parent: Some(value),
                    extension: operator.extension.clone(),
                    member,
                    args: smallvec![constant],
                };
                NodeAccess::Compare(self.plan.intern(path))
            }
            PatternKind::Constant(_) => {
                let Some(constant) = typed.constant(id) else {
                    return;
                };
                NodeAccess::Compare(self.equals(value, constant))
            }
            PatternKind::Identifier(_) => match typed.identifier(id) {
                Some(IdentifierResolution::Constant) => {
                    let Some(constant) = typed.constant(id) else {
                        return;
                    };
                    NodeAccess::Compare(self.equals(value, constant))
                }
                Some(_) => NodeAccess::Leaf,
                None => return,
            },
            PatternKind::List { elements, .. } => {
                let elements = arena.list(*elements);
                let rest = elements
                    .iter()
                    .position(|&e| matches!(arena.kind(e), PatternKind::Rest(_)));
                let head = rest.unwrap_or(elements.len());
                let tail = rest.map_or(0, |r| elements.len() - r - 1);

                let length = self.plan.intern(AccessPath::child(value, Member::Length));
                let mut paths = Vec::with_capacity(elements.len());
                for (i, &element) in elements.iter().enumerate() {
                    let (member, args): (Member, SmallVec<[ConstValue; 2]>) = if i < head {
                        (Member::Index, smallvec![ConstValue::Int(count(i))])
                    } else if Some(i) == rest {
                        (
                            Member::Sublist,
                            smallvec![ConstValue::Int(count(head)), ConstValue::Int(count(tail))],
                        )
                    } else {
                        let from_end = count(elements.len() - i);
                        (Member::Index, smallvec![ConstValue::Int(-from_end)])
                    };
                    let path = self.plan.intern(AccessPath {
                        parent: Some(value),
                        extension: None,
                        member,
                        args,
                    });
                    self.visit(element, path);
                    paths.push(path);
                }
                NodeAccess::List {
                    length,
                    elements: paths,
                }
            }
            PatternKind::Map { entries, .. } => {
                let Some(keys) = typed.map_keys(id) else {
                    return;
                };
                let mut accesses = Vec::with_capacity(entries.len());
                for (entry, &key) in entries.iter().zip(keys) {
                    let lookup = self.plan.intern(AccessPath {
                        parent: Some(value),
                        extension: None,
                        member: Member::Lookup,
                        args: smallvec![key],
                    });
                    let contains = self.plan.intern(AccessPath {
                        parent: Some(value),
                        extension: None,
                        member: Member::ContainsKey,
                        args: smallvec![key],
                    });
                    self.visit(entry.value, lookup);
                    accesses.push(MapAccess { lookup, contains });
                }
                NodeAccess::Map(accesses)
            }
            PatternKind::Record(fields) => {
                let mut positional = 0u32;
                let mut paths = Vec::with_capacity(fields.len());
                for field in fields {
                    let member = match field.name {
                        Some(name) => Member::Field(name),
                        None => {
                            positional += 1;
                            Member::Positional(positional - 1)
                        }
                    };
                    let path = self.plan.intern(AccessPath::child(value, member));
                    self.visit(field.pattern, path);
                    paths.push(path);
                }
                NodeAccess::Fields(paths)
            }
            PatternKind::Object { fields, .. } => {
                let mut paths = Vec::with_capacity(fields.len());
                for (i, field) in fields.iter().enumerate() {
                    let Some(getter) = typed.getter(id, i) else {
                        return;
                    };
                    let path = self.plan.intern(AccessPath {
                        parent: Some(value),
                        extension: getter.extension.clone(),
                        member: Member::Getter(getter.name),
                        args: SmallVec::new(),
                    });
                    self.visit(field.pattern, path);
                    paths.push(path);
                }
                NodeAccess::Fields(paths)
            }
        };
        self.plan.set(id, NodePlan { value, access });
    }

    fn equals(&mut self, value: PathId, constant: ConstValue) -> PathId {
        self.plan.intern(AccessPath {
            parent: Some(value),
            extension: None,
            member: Member::Equals,
            args: smallvec![constant],
        })
    }
}
