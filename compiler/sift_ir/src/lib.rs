//! Sift IR - pattern trees and the identifiers they are built from.
//!
//! This crate contains the data every other sift crate shares:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Parsed type references written inside patterns
//! - Constant expressions referenced by relational, constant and map patterns
//! - The pattern arena (`PatternArena`) and its node kinds
//!
//! # Design
//!
//! - **Intern Everything**: strings become `Name(u32)`
//! - **Flatten Everything**: no `Box<Pattern>`, children are `PatternId(u32)`
//! - **Immutable trees**: a pattern tree is built once; typing results live in
//!   side tables keyed by `PatternId`, never in the nodes themselves
//!
//! Types that contain floats store them as u64 bits for Hash compatibility.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod constant;
mod interner;
mod mode;
mod name;
mod parsed_type;
pub mod pattern;
mod span;

pub use constant::{ConstArena, ConstExpr, ConstId, ConstValue};
pub use interner::{InternError, StringInterner, StringLookup};
pub use mode::{IdentifierResolution, PatternMode, RelationalOp};
pub use name::Name;
pub use parsed_type::ParsedType;
pub use pattern::{
    ArenaOverflow, MapEntry, ObjectField, Pattern, PatternArena, PatternId, PatternKind,
    PatternRange, RecordField,
};
pub use span::Span;
