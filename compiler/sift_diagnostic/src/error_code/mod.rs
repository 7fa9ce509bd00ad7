//! Error codes for pattern diagnostics.
//!
//! The first digit is the phase:
//! - E3xxx: pattern type checking
//! - E6xxx: runtime match failures
//! - E9xxx: internal errors
//! - W3xxx: pattern warnings

use std::fmt;

/// Error codes for all pattern diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Pattern Errors (E3xxx)
    /// Refutable pattern in a declaration or assignment
    E3001,
    /// Logical-or branches bind different variables
    E3002,
    /// Variable bound twice in one pattern
    E3003,
    /// Duplicate named field in a record pattern
    E3004,
    /// Duplicate key in a map pattern
    E3005,
    /// More than one rest element in a list pattern
    E3006,
    /// Rest element outside a list pattern
    E3007,
    /// Non-constant expression where a constant is required
    E3008,
    /// Unknown type in a pattern
    E3009,
    /// Unknown getter in an object pattern
    E3010,
    /// Relational operator not defined for the matched type
    E3011,
    /// Relational operator does not return bool
    E3012,
    /// Matched value not assignable to the pattern's required type
    E3013,
    /// Assignment to a final variable
    E3014,
    /// Assignment to an undeclared variable
    E3015,
    /// Variable assigned twice in one assignment pattern
    E3016,
    /// Reference to a variable that is not shared by every case
    E3017,
    /// Switch is not exhaustive
    E3018,
    /// Wrong number of type arguments
    E3019,
    /// Unresolved name in a constant pattern
    E3020,
    /// Variable declared inside an assignment pattern
    E3021,

    // Runtime Errors (E6xxx)
    /// Cast pattern failed
    E6001,
    /// Null-assert pattern matched null
    E6002,
    /// Relational operator returned a non-bool value
    E6003,
    /// No case matched an exhaustive switch
    E6004,
    /// Declaration or assignment pattern did not match
    E6005,
    /// Member lookup failed at runtime
    E6006,
    /// Deferred assignment could not be committed
    E6007,
    /// Error raised while invoking a member
    E6099,

    // Internal Errors (E9xxx)
    /// Pattern annotation written twice
    E9001,
    /// Pattern matched before it was type checked
    E9002,

    // Warnings (W3xxx)
    /// Case can never be reached
    W3001,
    /// Constant can never match the matched type
    W3002,
}

impl ErrorCode {
    /// All variants, kept in sync with `as_str()`.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E3005,
        ErrorCode::E3006,
        ErrorCode::E3007,
        ErrorCode::E3008,
        ErrorCode::E3009,
        ErrorCode::E3010,
        ErrorCode::E3011,
        ErrorCode::E3012,
        ErrorCode::E3013,
        ErrorCode::E3014,
        ErrorCode::E3015,
        ErrorCode::E3016,
        ErrorCode::E3017,
        ErrorCode::E3018,
        ErrorCode::E3019,
        ErrorCode::E3020,
        ErrorCode::E3021,
        ErrorCode::E6001,
        ErrorCode::E6002,
        ErrorCode::E6003,
        ErrorCode::E6004,
        ErrorCode::E6005,
        ErrorCode::E6006,
        ErrorCode::E6007,
        ErrorCode::E6099,
        ErrorCode::E9001,
        ErrorCode::E9002,
        ErrorCode::W3001,
        ErrorCode::W3002,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            ErrorCode::E3008 => "E3008",
            ErrorCode::E3009 => "E3009",
            ErrorCode::E3010 => "E3010",
            ErrorCode::E3011 => "E3011",
            ErrorCode::E3012 => "E3012",
            ErrorCode::E3013 => "E3013",
            ErrorCode::E3014 => "E3014",
            ErrorCode::E3015 => "E3015",
            ErrorCode::E3016 => "E3016",
            ErrorCode::E3017 => "E3017",
            ErrorCode::E3018 => "E3018",
            ErrorCode::E3019 => "E3019",
            ErrorCode::E3020 => "E3020",
            ErrorCode::E3021 => "E3021",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
            ErrorCode::E6006 => "E6006",
            ErrorCode::E6007 => "E6007",
            ErrorCode::E6099 => "E6099",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
            ErrorCode::W3001 => "W3001",
            ErrorCode::W3002 => "W3002",
        }
    }

    /// E3xxx.
    pub fn is_pattern_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }

    /// E6xxx.
    pub fn is_runtime_error(&self) -> bool {
        self.as_str().starts_with("E6")
    }

    /// E9xxx.
    pub fn is_internal_error(&self) -> bool {
        self.as_str().starts_with("E9")
    }

    /// W3xxx.
    pub fn is_warning(&self) -> bool {
        self.as_str().starts_with('W')
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an error code string like `"E3001"`, case-insensitively.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
