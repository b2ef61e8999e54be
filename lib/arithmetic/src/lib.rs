//! Evaluation of untrusted arithmetic expressions
//!
//! Only numeric literals, `+ - * / ** %`, unary minus and parentheses are
//! accepted. Anything else is rejected while parsing, so no input can reach
//! names, calls or any other side effect.

use log::debug;

pub use config::Limits;
pub use error::{EvalError, Remainder};
pub use expression::{parse, Expr, Operator};
pub use format::format_number;
pub use value::Number;

mod config;
mod error;
mod eval;
mod expression;
mod format;
mod value;

#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    limits: Limits,
}

impl Evaluator {
    pub fn new(limits: Limits) -> Evaluator {
        Evaluator { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn try_evaluate(&self, expression: &str) -> Result<Number, EvalError> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(EvalError::EmptyExpression);
        }
        if expression.len() > self.limits.max_length {
            return Err(EvalError::TooComplex);
        }

        parse(expression, &self.limits)?.evaluate()
    }

    /// Evaluates `expression`, rendering failures as `Error: ...` rather than
    /// returning them
    pub fn evaluate(&self, expression: &str) -> String {
        let result = self.try_evaluate(expression);
        if let Err(e) = &result {
            debug!("Rejected expression: {}", e);
        }
        render(&result)
    }
}

pub fn render(result: &Result<Number, EvalError>) -> String {
    match result {
        Ok(v) => format_number(*v),
        Err(e) => format!("Error: {}", e),
    }
}

/// Evaluates `expression` with the default limits
pub fn evaluate(expression: &str) -> String {
    Evaluator::default().evaluate(expression)
}
