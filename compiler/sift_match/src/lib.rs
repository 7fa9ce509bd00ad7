#![allow(
    clippy::result_large_err,
    reason = "EvalError carries its message and notes; boxing would touch every signature"
)]
//! Runtime pattern matching for sift.
//!
//! This crate runs type checked patterns against values:
//! - Runtime values (`Value`, `Heap`) and fatal errors (`EvalError`, `EvalResult`)
//! - The access plan (`MatchPlan`): every member access a pattern performs,
//!   named structurally so logically identical accesses share one `PathId`
//! - The per-attempt `InvocationKeyCache` that evaluates each path once
//! - The `Matcher` itself, its `MatchExecutor` host interface and the
//!   `BuiltinExecutor` host
//! - The `Environment` that matched variables are declared or assigned in,
//!   and multi-case dispatch (`match_cases`)
//!
//! # Flow
//!
//! ```text
//! PatternArena + TypedPatterns
//!        │ MatchPlan::build
//!        ▼
//!     MatchPlan ──▶ Matcher ──get/compare/index──▶ MatchExecutor
//!                      │          (through InvocationKeyCache)
//!                      ▼
//!          MatchResult::Matched(Bindings) ──▶ Environment
//! ```

mod cache;
mod cases;
mod config;
mod environment;
mod errors;
mod executor;
mod matcher;
mod plan;
mod value;

#[cfg(test)]
mod test_helpers;

pub use cache::InvocationKeyCache;
pub use cases::{first_match, match_cases, CaseMatch};
pub use config::MatchConfig;
pub use environment::{AssignError, Environment, Mutability, Scope};
pub use errors::{EvalError, EvalErrorKind, EvalNote, EvalResult};
pub use executor::{BuiltinExecutor, MatchExecutor, NativeGetter, NativeOperator, RecordingHost};
pub use matcher::{Bindings, MatchContext, MatchProgram, MatchResult, Matcher};
pub use plan::{AccessPath, MapAccess, MatchPlan, Member, NodeAccess, NodePlan, PathId};
pub use value::{Heap, ListValue, MapValue, ObjectValue, RecordValue, Value};

// Error constructors, for hosts raising their own failures
pub use errors::{
    cast_failed, host_error, immutable_binding, irrefutable_match_failed, member_not_found,
    non_bool_comparison, non_exhaustive_match, not_annotated, null_assert_failed,
    undefined_variable,
};
