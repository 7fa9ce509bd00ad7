//! The type system seen through the engine's narrow interface.
//!
//! Pattern typing and matching only ever ask a handful of questions about
//! types: subtyping, greatest lower bounds, how to resolve a written type,
//! and which getter or operator a member access reaches. [`TypeOracle`] is
//! that interface; [`TypeRegistry`] is a small class-table implementation
//! of it.

mod registry;

pub use registry::{ClassDef, ExtensionDef, TypeRegistry};

use sift_ir::{ConstValue, Name, ParsedType, RelationalOp};

use crate::{Idx, Pool};

/// Identity of a registered extension.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ExtensionId(u32);

impl ExtensionId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExtensionId(index)
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

/// An extension member's owner together with its instantiation.
///
/// Two accesses reach the same member only if both the extension and its
/// type arguments agree, so this pair is part of an access path.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExtensionRef {
    pub id: ExtensionId,
    pub type_args: Vec<Idx>,
}

/// A resolved getter.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct GetterRef {
    pub name: Name,
    /// `Some` when the getter comes from an extension rather than the class.
    pub extension: Option<ExtensionRef>,
    /// Return type, already instantiated for the receiver.
    pub ty: Idx,
}

/// A resolved relational or equality operator.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct OperatorRef {
    pub op: RelationalOp,
    pub extension: Option<ExtensionRef>,
    /// Parameter type.
    pub operand: Idx,
    /// Return type; anything but `bool` or `dynamic` is rejected.
    pub ret: Idx,
}

/// Failure to turn a [`ParsedType`] into a pooled type.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ResolveError {
    UnknownType(Name),
    WrongArity {
        name: Name,
        expected: usize,
        found: usize,
    },
}

/// Subtyping, bounds and member resolution.
///
/// Methods take the pool mutably because answering may need to intern new
/// types (an instantiated supertype, a GLB).
pub trait TypeOracle {
    /// `sub <: sup`
    fn is_subtype(&self, pool: &mut Pool, sub: Idx, sup: Idx) -> bool;

    /// Greatest lower bound. A schema hole on either side yields the other side.
    fn glb(&self, pool: &mut Pool, a: Idx, b: Idx) -> Idx;

    /// Resolve a written type. Omitted type arguments become `dynamic`.
    fn resolve_type(&self, pool: &mut Pool, ty: &ParsedType) -> Result<Idx, ResolveError>;

    /// Number of type parameters of a class, `None` if the class is unknown.
    fn type_parameter_count(&self, class: Name) -> Option<usize>;

    /// The type `class<args>`, `None` if the class is unknown.
    fn instantiate(&self, pool: &mut Pool, class: Name, args: &[Idx]) -> Option<Idx>;

    /// Type arguments `A` such that `ty` implements `class<A>`.
    fn as_instance_of(&self, pool: &mut Pool, ty: Idx, class: Name) -> Option<Vec<Idx>>;

    /// Getter `name` on `receiver`, searching extensions after the class.
    fn lookup_getter(&self, pool: &mut Pool, receiver: Idx, name: Name) -> Option<GetterRef>;

    /// Operator `op` on `receiver`, searching extensions after the class.
    fn lookup_operator(&self, pool: &mut Pool, receiver: Idx, op: RelationalOp)
        -> Option<OperatorRef>;

    /// Static type of a constant.
    fn constant_type(&self, pool: &mut Pool, value: ConstValue) -> Idx;

    /// Type arguments for an object pattern naming a generic `class` without
    /// arguments, inferred from the matched type.
    ///
    /// Uses the matched type's own arguments when it implements `class`,
    /// otherwise `dynamic` for every parameter.
    fn infer_type_arguments(&self, pool: &mut Pool, class: Name, matched: Idx) -> Vec<Idx> {
        let count = self.type_parameter_count(class).unwrap_or(0);
        let receiver = pool.non_null(matched);
        match self.as_instance_of(pool, receiver, class) {
            Some(args) if args.len() == count => args,
            _ => vec![Idx::DYNAMIC; count],
        }
    }

    /// `E` such that `ty` implements `List<E>`.
    fn as_list(&self, pool: &mut Pool, ty: Idx) -> Option<Idx> {
        pool.list_elem(ty)
    }

    /// `(K, V)` such that `ty` implements `Map<K, V>`.
    fn as_map(&self, pool: &mut Pool, ty: Idx) -> Option<(Idx, Idx)> {
        pool.map_types(ty)
    }

    /// Whether `null` is a member of `ty`.
    fn is_nullable(&self, pool: &Pool, ty: Idx) -> bool {
        pool.is_nullable(ty)
    }
}
