use std::fmt;

use derive_more::Display;
use strum_macros::AsRefStr;

/// Unparsed input at the point an expression was rejected
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Remainder(pub String);

impl From<&str> for Remainder {
    fn from(s: &str) -> Self {
        Remainder(s.to_string())
    }
}

impl fmt::Display for Remainder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "end of expression")
        } else {
            write!(f, "\"{}\"", self.0)
        }
    }
}

#[derive(Debug, Display, Clone, PartialEq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum EvalError {
    #[display(fmt = "Empty Expression")]
    EmptyExpression,

    #[display(fmt = "Unsupported syntax at {}", _0)]
    UnsupportedSyntax(Remainder),

    #[display(fmt = "Division by zero")]
    DivisionByZero,

    #[display(fmt = "Expression too complex")]
    TooComplex,

    #[display(fmt = "Result out of range")]
    Overflow,

    #[display(fmt = "Result is not a real number")]
    ComplexResult,
}

impl std::error::Error for EvalError {}
