//! Pattern contexts and relational operators.

use std::fmt;

/// The construct a pattern appears in.
///
/// The mode is chosen by the caller and fixes, once, how bare identifiers
/// are read and whether refutable kinds are legal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PatternMode {
    /// `var (a, b) = e;` / `final [x, y] = e;`
    Declaration { is_final: bool },
    /// `(a, b) = (b, a);` - identifiers name existing variables.
    Assignment,
    /// switch cases, if-case: refutable, identifiers name constants.
    Matching,
}

impl PatternMode {
    /// Declarations and assignments have no control flow to handle a failed match.
    #[inline]
    pub const fn is_irrefutable(self) -> bool {
        !matches!(self, PatternMode::Matching)
    }
}

/// How an identifier pattern was read, decided during type checking.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum IdentifierResolution {
    /// `_`: matches anything, binds nothing.
    Wildcard,
    /// Matching mode: the identifier names a constant, compared with `==`.
    Constant,
    /// Declaration mode: introduces a new variable.
    Declare,
    /// Assignment mode: stores into an existing variable.
    Assign,
}

/// Operator of a relational pattern (`== c`, `< c`, ...).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum RelationalOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl RelationalOp {
    /// `==` and `!=` are resolved as equality, which every type supports.
    #[inline]
    pub const fn is_equality(self) -> bool {
        matches!(self, RelationalOp::Eq | RelationalOp::NotEq)
    }

    pub const fn as_symbol(self) -> &'static str {
        match self {
            RelationalOp::Eq => "==",
            RelationalOp::NotEq => "!=",
            RelationalOp::Lt => "<",
            RelationalOp::LtEq => "<=",
            RelationalOp::Gt => ">",
            RelationalOp::GtEq => ">=",
        }
    }
}

impl fmt::Display for RelationalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}
