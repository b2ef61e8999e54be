use log::trace;

use crate::error::EvalError;
use crate::expression::{Expr, Operator};
use crate::value::Number;

impl Operator {
    pub fn apply(self, l: Number, r: Number) -> Result<Number, EvalError> {
        trace!("{} {:?} {:?}", self.as_ref(), l, r);
        match self {
            Operator::Add => Ok(l + r),
            Operator::Subtract => Ok(l - r),
            Operator::Multiply => Ok(l * r),
            Operator::Divide => l.checked_div(r),
            Operator::Power => l.checked_pow(r),
            Operator::Modulo => l.checked_rem(r),
        }
    }
}

impl Expr {
    /// Evaluates the left operand before the right, so the leftmost error wins
    pub fn evaluate(&self) -> Result<Number, EvalError> {
        let value = match self {
            Expr::Literal(v) => *v,
            Expr::Negate(e) => -e.evaluate()?,
            Expr::Binary(op, l, r) => {
                let left = l.evaluate()?;
                op.apply(left, r.evaluate()?)?
            }
        };
        value.finite()
    }
}
