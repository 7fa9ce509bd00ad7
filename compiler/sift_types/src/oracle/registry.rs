//! Class-table type oracle.
//!
//! Built-in types (`int`, `String`, `List<E>`, ...) are described with the
//! same [`ClassDef`] records user classes use, so member lookup and the
//! supertype walk are uniform. Type parameters are bound by substitution
//! while resolving the `ParsedType`s stored in the table.

use rustc_hash::FxHashMap;
use sift_ir::{ConstValue, Name, ParsedType, RelationalOp, StringInterner};
use tracing::trace;

use super::{ExtensionId, ExtensionRef, GetterRef, OperatorRef, ResolveError, TypeOracle};
use crate::{Idx, Pool, Tag};

/// Supertype chains longer than this are treated as cyclic.
const MAX_SUPERTYPE_DEPTH: usize = 32;

/// Type parameter bindings while resolving a member's declared type.
type Subst = Vec<(Name, Idx)>;

/// A relational operator declaration.
#[derive(Clone, Debug)]
struct OperatorDef {
    op: RelationalOp,
    operand: ParsedType,
    ret: ParsedType,
}

/// A class: type parameters, direct supertypes and members.
#[derive(Clone, Debug)]
pub struct ClassDef {
    name: Name,
    type_params: Vec<Name>,
    supertypes: Vec<ParsedType>,
    getters: Vec<(Name, ParsedType)>,
    operators: Vec<OperatorDef>,
}

impl ClassDef {
    pub fn new(name: Name) -> Self {
        ClassDef {
            name,
            type_params: Vec::new(),
            supertypes: Vec::new(),
            getters: Vec::new(),
            operators: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_type_params(mut self, params: &[Name]) -> Self {
        self.type_params = params.to_vec();
        self
    }

    /// Add a direct supertype. It may mention the class's type parameters.
    #[must_use]
    pub fn with_supertype(mut self, ty: ParsedType) -> Self {
        self.supertypes.push(ty);
        self
    }

    #[must_use]
    pub fn with_getter(mut self, name: Name, ty: ParsedType) -> Self {
        self.getters.push((name, ty));
        self
    }

    #[must_use]
    pub fn with_operator(mut self, op: RelationalOp, operand: ParsedType, ret: ParsedType) -> Self {
        self.operators.push(OperatorDef { op, operand, ret });
        self
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn type_params(&self) -> &[Name] {
        &self.type_params
    }

    fn getter(&self, name: Name) -> Option<&ParsedType> {
        self.getters
            .iter()
            .find_map(|(getter, ty)| (*getter == name).then_some(ty))
    }

    fn operator(&self, op: RelationalOp) -> Option<&OperatorDef> {
        self.operators.iter().find(|def| def.op == op)
    }
}

/// Members added to a class from outside it.
///
/// The extension's type parameters are bound, in order, to the type
/// arguments of the receiver's instance of `on`.
#[derive(Clone, Debug)]
pub struct ExtensionDef {
    on: Name,
    members: ClassDef,
}

impl ExtensionDef {
    pub fn new(on: Name) -> Self {
        ExtensionDef {
            on,
            members: ClassDef::new(on),
        }
    }

    #[must_use]
    pub fn with_type_params(mut self, params: &[Name]) -> Self {
        self.members = self.members.with_type_params(params);
        self
    }

    #[must_use]
    pub fn with_getter(mut self, name: Name, ty: ParsedType) -> Self {
        self.members = self.members.with_getter(name, ty);
        self
    }

    #[must_use]
    pub fn with_operator(mut self, op: RelationalOp, operand: ParsedType, ret: ParsedType) -> Self {
        self.members = self.members.with_operator(op, operand, ret);
        self
    }

    /// The class this extension applies to.
    pub fn on(&self) -> Name {
        self.on
    }
}

/// Names the registry itself refers to.
#[derive(Copy, Clone, Debug)]
struct BuiltinNames {
    object: Name,
    list: Name,
    map: Name,
    index: Name,
    name: Name,
}

/// Reference [`TypeOracle`] backed by a class table.
pub struct TypeRegistry {
    names: BuiltinNames,
    primitives: FxHashMap<Name, Idx>,
    classes: FxHashMap<Name, ClassDef>,
    enums: FxHashMap<Name, Vec<Name>>,
    extensions: Vec<ExtensionDef>,
}

impl TypeRegistry {
    /// A registry holding the built-in classes.
    pub fn new(interner: &StringInterner) -> Self {
        let n = |s: &str| interner.intern(s);
        let named = |s: &str| ParsedType::named(interner.intern(s));
        let names = BuiltinNames {
            object: n("Object"),
            list: n("List"),
            map: n("Map"),
            index: n("index"),
            name: n("name"),
        };

        let mut primitives = FxHashMap::default();
        for (s, idx) in [
            ("dynamic", Idx::DYNAMIC),
            ("Object", Idx::OBJECT),
            ("Null", Idx::NULL),
            ("Never", Idx::NEVER),
            ("bool", Idx::BOOL),
            ("int", Idx::INT),
            ("double", Idx::DOUBLE),
            ("num", Idx::NUM),
            ("String", Idx::STR),
        ] {
            primitives.insert(n(s), idx);
        }

        let mut registry = TypeRegistry {
            names,
            primitives,
            classes: FxHashMap::default(),
            enums: FxHashMap::default(),
            extensions: Vec::new(),
        };

        let bool_ty = named("bool");
        let int_ty = named("int");
        let num_ty = named("num");
        let e = n("E");
        let k = n("K");
        let v = n("V");

        registry.define_class(
            ClassDef::new(names.object)
                .with_getter(n("hashCode"), int_ty.clone())
                .with_operator(RelationalOp::Eq, named("Object").nullable(), bool_ty.clone()),
        );
        registry.define_class(ClassDef::new(n("Null")));
        registry.define_class(ClassDef::new(n("bool")));

        let mut num = ClassDef::new(n("num"))
            .with_getter(n("isNegative"), bool_ty.clone())
            .with_getter(n("sign"), num_ty.clone());
        for op in [
            RelationalOp::Lt,
            RelationalOp::LtEq,
            RelationalOp::Gt,
            RelationalOp::GtEq,
        ] {
            num = num.with_operator(op, num_ty.clone(), bool_ty.clone());
        }
        registry.define_class(num);
        registry.define_class(
            ClassDef::new(n("int"))
                .with_supertype(num_ty.clone())
                .with_getter(n("isEven"), bool_ty.clone())
                .with_getter(n("isOdd"), bool_ty.clone())
                .with_getter(n("sign"), int_ty.clone()),
        );
        registry.define_class(
            ClassDef::new(n("double"))
                .with_supertype(num_ty)
                .with_getter(n("isNaN"), bool_ty.clone())
                .with_getter(n("sign"), named("double")),
        );
        registry.define_class(
            ClassDef::new(n("String"))
                .with_getter(n("length"), int_ty.clone())
                .with_getter(n("isEmpty"), bool_ty.clone())
                .with_getter(n("isNotEmpty"), bool_ty.clone()),
        );
        registry.define_class(
            ClassDef::new(names.list)
                .with_type_params(&[e])
                .with_getter(n("length"), int_ty.clone())
                .with_getter(n("isEmpty"), bool_ty.clone())
                .with_getter(n("isNotEmpty"), bool_ty.clone())
                .with_getter(n("first"), ParsedType::named(e))
                .with_getter(n("last"), ParsedType::named(e)),
        );
        registry.define_class(
            ClassDef::new(names.map)
                .with_type_params(&[k, v])
                .with_getter(n("length"), int_ty)
                .with_getter(n("isEmpty"), bool_ty.clone())
                .with_getter(n("isNotEmpty"), bool_ty),
        );
        registry
    }

    /// Register a class, replacing any class of the same name.
    pub fn define_class(&mut self, def: ClassDef) {
        self.classes.insert(def.name, def);
    }

    /// Register an enum. Its values are `ConstValue::Enum` constants.
    pub fn define_enum(&mut self, name: Name, variants: &[Name]) {
        self.enums.insert(name, variants.to_vec());
    }

    /// Register an extension and return its identity.
    pub fn define_extension(&mut self, def: ExtensionDef) -> ExtensionId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "extension counts are bounded far below u32::MAX"
        )]
        let id = ExtensionId::new(self.extensions.len() as u32);
        self.extensions.push(def);
        id
    }

    pub fn class(&self, name: Name) -> Option<&ClassDef> {
        self.classes.get(&name)
    }

    pub fn extension(&self, id: ExtensionId) -> Option<&ExtensionDef> {
        self.extensions.get(id.index())
    }

    /// Variants of an enum in declaration order.
    pub fn enum_variants(&self, name: Name) -> Option<&[Name]> {
        self.enums.get(&name).map(Vec::as_slice)
    }

    // === Resolution ===

    fn resolve_in(&self, pool: &mut Pool, ty: &ParsedType, subst: &Subst) -> Result<Idx, ResolveError> {
        match ty {
            ParsedType::Dynamic => Ok(Idx::DYNAMIC),
            ParsedType::Nullable(inner) => {
                let inner = self.resolve_in(pool, inner, subst)?;
                Ok(pool.nullable(inner))
            }
            ParsedType::Record { positional, named } => {
                let positional = positional
                    .iter()
                    .map(|ty| self.resolve_in(pool, ty, subst))
                    .collect::<Result<Vec<_>, _>>()?;
                let named = named
                    .iter()
                    .map(|(name, ty)| Ok((*name, self.resolve_in(pool, ty, subst)?)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(pool.record(&positional, &named))
            }
            ParsedType::Named { name, args } => {
                if args.is_empty() {
                    if let Some(&(_, bound)) = subst.iter().find(|(param, _)| param == name) {
                        return Ok(bound);
                    }
                }
                let expected = self
                    .type_parameter_count(*name)
                    .ok_or(ResolveError::UnknownType(*name))?;
                let args = if args.is_empty() {
                    vec![Idx::DYNAMIC; expected]
                } else if args.len() == expected {
                    args.iter()
                        .map(|arg| self.resolve_in(pool, arg, subst))
                        .collect::<Result<Vec<_>, _>>()?
                } else {
                    return Err(ResolveError::WrongArity {
                        name: *name,
                        expected,
                        found: args.len(),
                    });
                };
                self.instantiate(pool, *name, &args)
                    .ok_or(ResolveError::UnknownType(*name))
            }
        }
    }

    /// Resolve a member's declared type, falling back to `dynamic` for
    /// table entries that name unknown types.
    fn member_type(&self, pool: &mut Pool, ty: &ParsedType, subst: &Subst) -> Idx {
        self.resolve_in(pool, ty, subst).unwrap_or(Idx::DYNAMIC)
    }

    /// Class name and arguments of a non-nullable type, if it has one.
    fn class_view(&self, pool: &Pool, ty: Idx) -> Option<(Name, Vec<Idx>)> {
        if ty.is_primitive() {
            return self
                .primitives
                .iter()
                .find_map(|(&name, &idx)| (idx == ty && !ty.is_dynamic()).then(|| (name, Vec::new())));
        }
        match pool.tag(ty) {
            Tag::List => pool.list_elem(ty).map(|elem| (self.names.list, vec![elem])),
            Tag::Map => pool.map_types(ty).map(|(k, v)| (self.names.map, vec![k, v])),
            Tag::Named => pool.named_parts(ty),
            _ => None,
        }
    }

    fn substitution(params: &[Name], args: &[Idx]) -> Subst {
        params
            .iter()
            .enumerate()
            .map(|(i, &param)| (param, args.get(i).copied().unwrap_or(Idx::DYNAMIC)))
            .collect()
    }

    /// The class, its transitive supertypes (each with its substitution)
    /// and finally `Object`, nearest first.
    fn class_chain(&self, pool: &mut Pool, class: Name, args: &[Idx]) -> Vec<(&ClassDef, Subst)> {
        let mut chain: Vec<(&ClassDef, Subst)> = Vec::new();
        let mut queue = vec![(class, args.to_vec())];
        while let Some((name, args)) = queue.pop() {
            if chain.len() > MAX_SUPERTYPE_DEPTH {
                break;
            }
            if chain.iter().any(|(def, _)| def.name == name) {
                continue;
            }
            let Some(def) = self.classes.get(&name) else {
                continue;
            };
            let subst = Self::substitution(&def.type_params, &args);
            let mut supers = Vec::new();
            for sup in &def.supertypes {
                let Ok(sup) = self.resolve_in(pool, sup, &subst) else {
                    continue;
                };
                if let Some(view) = self.class_view(pool, sup) {
                    supers.push(view);
                }
            }
            chain.push((def, subst));
            // Depth-first in declaration order.
            queue.extend(supers.into_iter().rev());
        }
        if let Some(object) = self.classes.get(&self.names.object) {
            if !chain.iter().any(|(def, _)| def.name == object.name) {
                chain.push((object, Vec::new()));
            }
        }
        chain
    }

    fn enum_getter(&self, name: Name) -> Option<Idx> {
        if name == self.names.index {
            Some(Idx::INT)
        } else if name == self.names.name {
            Some(Idx::STR)
        } else {
            None
        }
    }

    /// Receivers whose members are statically unknown.
    fn opaque_member_type(receiver: Idx) -> Option<Idx> {
        match receiver {
            Idx::DYNAMIC | Idx::HOLE => Some(Idx::DYNAMIC),
            Idx::ERROR => Some(Idx::ERROR),
            Idx::NEVER => Some(Idx::NEVER),
            _ => None,
        }
    }

    /// Extensions applicable to `receiver`, with their type arguments.
    fn applicable_extensions(&self, pool: &mut Pool, receiver: Idx) -> Vec<(ExtensionId, &ExtensionDef, Vec<Idx>)> {
        let mut found = Vec::new();
        for (i, ext) in self.extensions.iter().enumerate() {
            if let Some(args) = self.as_instance_of(pool, receiver, ext.on) {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "extension counts are bounded far below u32::MAX"
                )]
                let id = ExtensionId::new(i as u32);
                let type_args = ext
                    .members
                    .type_params
                    .iter()
                    .enumerate()
                    .map(|(j, _)| args.get(j).copied().unwrap_or(Idx::DYNAMIC))
                    .collect();
                found.push((id, ext, type_args));
            }
        }
        found
    }
}

impl TypeOracle for TypeRegistry {
    fn is_subtype(&self, pool: &mut Pool, sub: Idx, sup: Idx) -> bool {
        if sub == sup || sup.is_top() {
            return true;
        }
        if matches!(sub, Idx::NEVER | Idx::ERROR | Idx::HOLE) {
            return true;
        }
        if sub.is_dynamic() {
            return false;
        }
        if pool.is_nullable(sup) {
            if sub == Idx::NULL {
                return true;
            }
            let sub_inner = pool.non_null(sub);
            let sup_inner = pool.non_null(sup);
            return self.is_subtype(pool, sub_inner, sup_inner);
        }
        if pool.is_nullable(sub) {
            return false;
        }
        if sup == Idx::OBJECT {
            return true;
        }
        if sup == Idx::NEVER {
            return false;
        }
        match (pool.tag(sub), pool.tag(sup)) {
            (Tag::Record, Tag::Record) => {
                let (Some(a), Some(b)) = (pool.record_shape(sub), pool.record_shape(sup)) else {
                    return false;
                };
                a.same_shape(&b)
                    && a.field_types()
                        .zip(b.field_types())
                        .all(|(x, y)| self.is_subtype(pool, x, y))
            }
            (_, Tag::Record) | (Tag::Record, _) => false,
            _ => {
                let Some((class, sup_args)) = self.class_view(pool, sup) else {
                    return false;
                };
                match self.as_instance_of(pool, sub, class) {
                    Some(args) => {
                        args.len() == sup_args.len()
                            && args
                                .into_iter()
                                .zip(sup_args)
                                .all(|(a, b)| self.is_subtype(pool, a, b))
                    }
                    None => false,
                }
            }
        }
    }

    fn glb(&self, pool: &mut Pool, a: Idx, b: Idx) -> Idx {
        if a == b {
            return a;
        }
        if a.is_hole() {
            return b;
        }
        if b.is_hole() {
            return a;
        }
        match (pool.tag(a), pool.tag(b)) {
            (Tag::List, Tag::List) => {
                if let (Some(x), Some(y)) = (pool.list_elem(a), pool.list_elem(b)) {
                    let elem = self.glb(pool, x, y);
                    return pool.list(elem);
                }
            }
            (Tag::Map, Tag::Map) => {
                if let (Some((k1, v1)), Some((k2, v2))) = (pool.map_types(a), pool.map_types(b)) {
                    let key = self.glb(pool, k1, k2);
                    let value = self.glb(pool, v1, v2);
                    return pool.map(key, value);
                }
            }
            (Tag::Record, Tag::Record) => {
                if let (Some(x), Some(y)) = (pool.record_shape(a), pool.record_shape(b)) {
                    if x.same_shape(&y) {
                        let positional = x
                            .positional
                            .iter()
                            .zip(&y.positional)
                            .map(|(&p, &q)| self.glb(pool, p, q))
                            .collect::<Vec<_>>();
                        let named = x
                            .named
                            .iter()
                            .zip(&y.named)
                            .map(|(&(name, p), &(_, q))| (name, self.glb(pool, p, q)))
                            .collect::<Vec<_>>();
                        return pool.record(&positional, &named);
                    }
                }
            }
            (Tag::Nullable, Tag::Nullable) => {
                if let (Some(x), Some(y)) = (pool.nullable_inner(a), pool.nullable_inner(b)) {
                    let inner = self.glb(pool, x, y);
                    return pool.nullable(inner);
                }
            }
            _ => {}
        }
        if self.is_subtype(pool, a, b) {
            return a;
        }
        if self.is_subtype(pool, b, a) {
            return b;
        }
        if pool.is_nullable(a) && !pool.is_nullable(b) {
            let a = pool.non_null(a);
            return self.glb(pool, a, b);
        }
        if pool.is_nullable(b) && !pool.is_nullable(a) {
            let b = pool.non_null(b);
            return self.glb(pool, a, b);
        }
        Idx::NEVER
    }

    fn resolve_type(&self, pool: &mut Pool, ty: &ParsedType) -> Result<Idx, ResolveError> {
        self.resolve_in(pool, ty, &Vec::new())
    }

    fn type_parameter_count(&self, class: Name) -> Option<usize> {
        if self.primitives.contains_key(&class) || self.enums.contains_key(&class) {
            return Some(0);
        }
        self.classes.get(&class).map(|def| def.type_params.len())
    }

    fn instantiate(&self, pool: &mut Pool, class: Name, args: &[Idx]) -> Option<Idx> {
        let arg = |i: usize| args.get(i).copied().unwrap_or(Idx::DYNAMIC);
        if let Some(&idx) = self.primitives.get(&class) {
            return Some(idx);
        }
        if class == self.names.list {
            return Some(pool.list(arg(0)));
        }
        if class == self.names.map {
            return Some(pool.map(arg(0), arg(1)));
        }
        if self.enums.contains_key(&class) || self.classes.contains_key(&class) {
            return Some(pool.named(class, args));
        }
        None
    }

    fn as_instance_of(&self, pool: &mut Pool, ty: Idx, class: Name) -> Option<Vec<Idx>> {
        if ty.is_top() || pool.is_nullable(ty) || ty == Idx::NEVER {
            return None;
        }
        if class == self.names.object {
            return Some(Vec::new());
        }
        let (own, args) = self.class_view(pool, ty)?;
        if own == class {
            return Some(args);
        }
        self.class_chain(pool, own, &args)
            .into_iter()
            .find(|(def, _)| def.name == class)
            .map(|(def, subst)| {
                def.type_params
                    .iter()
                    .map(|param| {
                        subst
                            .iter()
                            .find_map(|&(p, idx)| (p == *param).then_some(idx))
                            .unwrap_or(Idx::DYNAMIC)
                    })
                    .collect()
            })
    }

    fn as_list(&self, pool: &mut Pool, ty: Idx) -> Option<Idx> {
        match self.as_instance_of(pool, ty, self.names.list)?.as_slice() {
            [elem] => Some(*elem),
            _ => None,
        }
    }

    fn as_map(&self, pool: &mut Pool, ty: Idx) -> Option<(Idx, Idx)> {
        match self.as_instance_of(pool, ty, self.names.map)?.as_slice() {
            [key, value] => Some((*key, *value)),
            _ => None,
        }
    }

    fn lookup_getter(&self, pool: &mut Pool, receiver: Idx, name: Name) -> Option<GetterRef> {
        if let Some(ty) = Self::opaque_member_type(receiver) {
            return Some(GetterRef {
                name,
                extension: None,
                ty,
            });
        }
        let view = if pool.is_nullable(receiver) {
            Some((self.names.object, Vec::new()))
        } else {
            self.class_view(pool, receiver)
        };
        if let Some((class, args)) = view {
            if self.enums.contains_key(&class) {
                if let Some(ty) = self.enum_getter(name) {
                    return Some(GetterRef {
                        name,
                        extension: None,
                        ty,
                    });
                }
            }
            let found = self
                .class_chain(pool, class, &args)
                .into_iter()
                .find_map(|(def, subst)| def.getter(name).map(|ty| (ty.clone(), subst)));
            if let Some((ty, subst)) = found {
                let ty = self.member_type(pool, &ty, &subst);
                return Some(GetterRef {
                    name,
                    extension: None,
                    ty,
                });
            }
        }
        let found = self
            .applicable_extensions(pool, receiver)
            .into_iter()
            .find_map(|(id, ext, type_args)| {
                ext.members.getter(name).map(|ty| {
                    let subst = Self::substitution(&ext.members.type_params, &type_args);
                    (id, type_args, ty.clone(), subst)
                })
            });
        let (id, type_args, ty, subst) = found?;
        trace!(?id, "getter resolved through extension");
        let ty = self.member_type(pool, &ty, &subst);
        Some(GetterRef {
            name,
            extension: Some(ExtensionRef { id, type_args }),
            ty,
        })
    }

    fn lookup_operator(
        &self,
        pool: &mut Pool,
        receiver: Idx,
        op: RelationalOp,
    ) -> Option<OperatorRef> {
        if let Some(ty) = Self::opaque_member_type(receiver) {
            return Some(OperatorRef {
                op,
                extension: None,
                operand: ty,
                ret: ty,
            });
        }
        // `!=` is the negation of `==`.
        let declared = if op == RelationalOp::NotEq {
            RelationalOp::Eq
        } else {
            op
        };
        let view = if pool.is_nullable(receiver) || op.is_equality() {
            None
        } else {
            self.class_view(pool, receiver)
        };
        let mut found = None;
        if let Some((class, args)) = view {
            found = self
                .class_chain(pool, class, &args)
                .into_iter()
                .find_map(|(def, subst)| def.operator(declared).map(|d| (None, d.clone(), subst)));
        }
        if found.is_none() && !op.is_equality() {
            found = self
                .applicable_extensions(pool, receiver)
                .into_iter()
                .find_map(|(id, ext, type_args)| {
                    ext.members.operator(declared).map(|d| {
                        let subst = Self::substitution(&ext.members.type_params, &type_args);
                        (Some(ExtensionRef { id, type_args }), d.clone(), subst)
                    })
                });
        }
        if found.is_none() && op.is_equality() {
            found = self
                .classes
                .get(&self.names.object)
                .and_then(|def| def.operator(RelationalOp::Eq))
                .map(|d| (None, d.clone(), Vec::new()));
        }
        let (extension, def, subst) = found?;
        let operand = self.member_type(pool, &def.operand, &subst);
        let ret = self.member_type(pool, &def.ret, &subst);
        Some(OperatorRef {
            op,
            extension,
            operand,
            ret,
        })
    }

    fn constant_type(&self, pool: &mut Pool, value: ConstValue) -> Idx {
        match value {
            ConstValue::Null => Idx::NULL,
            ConstValue::Bool(_) => Idx::BOOL,
            ConstValue::Int(_) => Idx::INT,
            ConstValue::Double(_) => Idx::DOUBLE,
            ConstValue::Str(_) => Idx::STR,
            ConstValue::Enum { ty, .. } => pool.named(ty, &[]),
        }
    }
}
