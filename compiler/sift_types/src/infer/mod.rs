//! Pattern type inference.
//!
//! Inference runs in three phases, always in this order:
//!
//! 1. **Context schema** ([`schema`](TypeInferencer::schema)): bottom-up, each
//!    node produces a type that may contain holes (`_`). Refutable-only kinds
//!    have no schema; in a declaration or assignment they are errors.
//! 2. **Value type**: in irrefutable modes the root schema is handed to the
//!    [`ExpressionChecker`] as a hint for the subject expression, which
//!    returns the matched type `M`. In matching mode the subject is typed
//!    without any hint from the pattern.
//! 3. **Required types** ([`check`](TypeInferencer::check)): top-down, `M` is
//!    pushed through the tree, evolving as it is destructured, and every node
//!    receives its required type in [`TypedPatterns`].
//!
//! Errors are accumulated; a failing node gets the error type, which is
//! compatible with everything, so one mistake does not cascade.

mod check;
mod schema;

use rustc_hash::FxHashMap;
use sift_ir::{
    ConstArena, ConstExpr, ConstId, ConstValue, Name, ParsedType, PatternArena, PatternId,
    PatternMode, Span,
};
use tracing::debug;

use crate::{
    AnnotationConflict, EnvEntry, Idx, PatternEnv, Pool, ResolveError, TypeCheckError,
    TypeErrorKind, TypeOracle, TypedPatterns,
};

/// Types the subject expression on behalf of the inferencer.
///
/// The expression language is outside this crate; callers that have an
/// unchecked subject expression implement this to receive the pattern's
/// context type schema.
pub trait ExpressionChecker {
    /// Check the subject against `schema` (which may contain holes) and
    /// return its static type.
    fn check_subject(&mut self, pool: &mut Pool, schema: Idx) -> Idx;
}

/// The subject of a pattern.
pub enum Subject<'s> {
    /// A subject whose static type is already known.
    Typed(Idx),
    /// A subject expression still to be checked.
    Expression(&'s mut dyn ExpressionChecker),
}

/// Root-level result of inference.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PatternTypes {
    pub schema: Idx,
    pub matched: Idx,
    pub required: Idx,
}

/// Which written type of a node an annotation cache entry belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
enum AnnotationRole {
    Type,
    MapKey,
    MapValue,
}

/// Three-phase pattern type inferencer.
///
/// One inferencer checks one pattern tree. To check several trees that
/// share an arena (the cases of a switch), pass the previous
/// [`TypedPatterns`] on with [`with_typed`](Self::with_typed).
pub struct TypeInferencer<'a, O: TypeOracle + ?Sized> {
    pool: &'a mut Pool,
    oracle: &'a O,
    arena: &'a PatternArena,
    consts: &'a ConstArena,
    env: &'a PatternEnv,
    mode: PatternMode,
    typed: TypedPatterns,
    errors: Vec<TypeCheckError>,
    /// Resolved written types, so each is resolved (and reported) once.
    annotations: FxHashMap<(PatternId, AnnotationRole), Idx>,
    /// Inside a refutable node already reported as illegal.
    in_refutable: bool,
}

impl<'a, O: TypeOracle + ?Sized> TypeInferencer<'a, O> {
    pub fn new(
        pool: &'a mut Pool,
        oracle: &'a O,
        arena: &'a PatternArena,
        consts: &'a ConstArena,
        env: &'a PatternEnv,
        mode: PatternMode,
    ) -> Self {
        TypeInferencer {
            pool,
            oracle,
            arena,
            consts,
            env,
            mode,
            typed: TypedPatterns::new(),
            errors: Vec::new(),
            annotations: FxHashMap::default(),
            in_refutable: false,
        }
    }

    /// Continue filling an existing side table.
    #[must_use]
    pub fn with_typed(mut self, typed: TypedPatterns) -> Self {
        self.typed = typed;
        self
    }

    /// Run all three phases on the tree rooted at `root`.
    #[tracing::instrument(level = "debug", skip(self, subject))]
    pub fn infer(&mut self, root: PatternId, subject: Subject<'_>) -> PatternTypes {
        let schema = self.schema(root);
        let matched = match subject {
            Subject::Typed(ty) => ty,
            Subject::Expression(checker) => {
                let hint = if self.mode.is_irrefutable() {
                    schema
                } else {
                    Idx::HOLE
                };
                debug!(?hint, "checking subject expression");
                checker.check_subject(self.pool, hint)
            }
        };
        let required = self.check(root, matched);
        debug!(?schema, ?matched, ?required, "pattern inferred");
        PatternTypes {
            schema,
            matched,
            required,
        }
    }

    pub fn mode(&self) -> PatternMode {
        self.mode
    }

    pub fn typed(&self) -> &TypedPatterns {
        &self.typed
    }

    pub fn errors(&self) -> &[TypeCheckError] {
        &self.errors
    }

    /// Whether any non-warning error was reported.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| !e.is_warning())
    }

    pub fn into_parts(self) -> (TypedPatterns, Vec<TypeCheckError>) {
        (self.typed, self.errors)
    }

    // === Helpers shared by the phases ===

    fn error(&mut self, span: Span, kind: TypeErrorKind) {
        self.errors.push(TypeCheckError::new(span, kind));
    }

    fn record(&mut self, span: Span, written: Result<(), AnnotationConflict>) {
        if let Err(conflict) = written {
            self.errors.push(TypeCheckError::from((span, conflict)));
        }
    }

    /// Resolve a written type once per node and role.
    fn resolve_annotation(
        &mut self,
        id: PatternId,
        role: AnnotationRole,
        ty: &ParsedType,
    ) -> Idx {
        if let Some(&idx) = self.annotations.get(&(id, role)) {
            return idx;
        }
        let span = self.arena.span(id);
        let idx = match self.oracle.resolve_type(self.pool, ty) {
            Ok(idx) => idx,
            Err(ResolveError::UnknownType(name)) => {
                self.error(span, TypeErrorKind::UnknownType { name });
                Idx::ERROR
            }
            Err(ResolveError::WrongArity {
                name,
                expected,
                found,
            }) => {
                self.error(
                    span,
                    TypeErrorKind::WrongTypeArgCount {
                        name,
                        expected,
                        found,
                    },
                );
                Idx::ERROR
            }
        };
        self.annotations.insert((id, role), idx);
        idx
    }

    /// A raw generic class name in an object pattern (`Box(...)` for
    /// `Box<T>`), whose arguments are inferred rather than defaulted.
    fn inferred_class(&self, ty: &ParsedType) -> Option<(Name, usize)> {
        match ty {
            ParsedType::Named { name, args } if args.is_empty() => self
                .oracle
                .type_parameter_count(*name)
                .filter(|&count| count > 0)
                .map(|count| (*name, count)),
            _ => None,
        }
    }

    /// Value and static type of a constant expression.
    ///
    /// References must name constants; a variable or an unknown name is
    /// reported and yields `None`.
    fn const_value(&mut self, id: ConstId) -> Option<(ConstValue, Idx)> {
        let consts = self.consts;
        match *consts.get(id) {
            ConstExpr::Value(value) => {
                let ty = self.oracle.constant_type(self.pool, value);
                Some((value, ty))
            }
            ConstExpr::Reference(name) => self.resolve_constant_name(consts.span(id), name),
        }
    }

    fn resolve_constant_name(&mut self, span: Span, name: Name) -> Option<(ConstValue, Idx)> {
        match self.env.lookup(name) {
            Some(EnvEntry::Constant { value, ty }) => Some((value, ty)),
            Some(EnvEntry::Variable { .. }) => {
                self.error(span, TypeErrorKind::NonConstant { name });
                None
            }
            None => {
                self.error(span, TypeErrorKind::UnresolvedConstant { name });
                None
            }
        }
    }
}
