use strum_macros::AsRefStr;

use crate::value::Number;

pub use parser::parse;

mod parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulo,
}

/// A parsed arithmetic expression
///
/// The variants are the complete set of constructs the grammar accepts, evaluation
/// cannot reach anything outside of them
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Number),
    Negate(Box<Expr>),
    Binary(Operator, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub(crate) fn binary(op: Operator, l: Expr, r: Expr) -> Expr {
        Expr::Binary(op, Box::new(l), Box::new(r))
    }

    pub(crate) fn negate(self) -> Expr {
        Expr::Negate(Box::new(self))
    }
}
