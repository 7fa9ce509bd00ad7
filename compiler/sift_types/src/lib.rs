//! Pattern typing for sift.
//!
//! This crate answers the static questions about a pattern tree:
//! - **Types**: a hash-consed [`Pool`] of types addressed by [`Idx`], and the
//!   [`TypeOracle`] interface (with the [`TypeRegistry`] implementation) for
//!   subtyping, bounds and member lookup
//! - **Inference**: the three-phase [`TypeInferencer`], which records every
//!   node's schema and required type in [`TypedPatterns`]
//! - **Variables**: the [`VariableSet`] a pattern binds, and the
//!   [`SharedScope`] of a body reached by several cases
//! - **Shapes**: the [`PatternShape`] form of a typed pattern, which is what
//!   an [`ExhaustivenessOracle`] consumes
//!
//! # Architecture
//!
//! ```text
//! PatternArena + ConstArena (sift_ir)
//!        │
//!        ▼
//! TypeInferencer ──uses──▶ TypeOracle ──▶ Pool
//!        │
//!        ▼
//! TypedPatterns ──▶ resolve_variables / lower_shape
//! ```

mod env;
mod error;
mod flags;
mod idx;
mod infer;
mod oracle;
mod pool;
mod shape;
mod tag;
mod typed;
mod variables;

pub use env::{EnvEntry, PatternEnv};
pub use error::{TypeCheckError, TypeErrorKind};
pub use flags::TypeFlags;
pub use idx::Idx;
pub use infer::{ExpressionChecker, PatternTypes, Subject, TypeInferencer};
pub use oracle::{
    ClassDef, ExtensionDef, ExtensionId, ExtensionRef, GetterRef, OperatorRef, ResolveError,
    TypeOracle, TypeRegistry,
};
pub use pool::{Pool, RecordShape};
pub use shape::{
    check_cases, lower_shape, CaseShape, CatchAllOracle, ExhaustivenessOracle,
    ExhaustivenessVerdict, PatternShape, SubShape,
};
pub use tag::Tag;
pub use typed::{AnnotationConflict, AnnotationSlot, TypedPatterns};
pub use variables::{
    resolve_shared_scope, resolve_variables, Binding, SharedBinding, SharedScope, VariableSet,
};
