//! Diagnostics for pattern type checking and matching.
//!
//! Every diagnostic carries:
//! - an error code for searchability
//! - a message saying what went wrong
//! - a primary span saying where
//! - optional secondary labels and notes giving context

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
