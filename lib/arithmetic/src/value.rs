use std::convert::TryFrom;
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::EvalError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_float(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Self::Int(i) => i == 0,
            Self::Float(f) => f == 0.0,
        }
    }

    /// Rejects values that have left the real numbers
    pub fn finite(self) -> Result<Number, EvalError> {
        match self {
            Self::Float(f) if f.is_nan() => Err(EvalError::ComplexResult),
            Self::Float(f) if f.is_infinite() => Err(EvalError::Overflow),
            v => Ok(v),
        }
    }

    /// True division, always producing a float
    pub fn checked_div(self, rhs: Self) -> Result<Number, EvalError> {
        if rhs.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        Ok(Self::Float(self.as_float() / rhs.as_float()))
    }

    /// Floored modulo: a non-zero result takes the sign of the divisor
    pub fn checked_rem(self, rhs: Self) -> Result<Number, EvalError> {
        if rhs.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        match (self, rhs) {
            // i64::MIN % -1 is the only overflowing case and is exactly zero
            (Self::Int(l), Self::Int(r)) => match l.checked_rem(r) {
                Some(m) if m != 0 && (m < 0) != (r < 0) => Ok(Self::Int(m + r)),
                Some(m) => Ok(Self::Int(m)),
                None => Ok(Self::Int(0)),
            },
            (l, r) => {
                let (l, r) = (l.as_float(), r.as_float());
                let m = l % r;
                if m != 0.0 && (m < 0.0) != (r < 0.0) {
                    Ok(Self::Float(m + r))
                } else {
                    Ok(Self::Float(m))
                }
            }
        }
    }

    pub fn checked_pow(self, rhs: Self) -> Result<Number, EvalError> {
        match (self, rhs) {
            (Self::Int(base), Self::Int(exp)) if exp >= 0 => {
                let exact = u32::try_from(exp).ok().and_then(|e| base.checked_pow(e));
                Ok(match exact {
                    Some(v) => Self::Int(v),
                    None => Self::Float((base as f64).powf(exp as f64)),
                })
            }
            (l, r) => {
                let (base, exp) = (l.as_float(), r.as_float());
                if base == 0.0 && exp < 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Self::Float(base.powf(exp)))
            }
        }
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Self::Output {
        match self {
            Self::Int(i) => match i.checked_neg() {
                Some(v) => Self::Int(v),
                None => Self::Float(-(i as f64)),
            },
            Self::Float(f) => Self::Float(-f),
        }
    }
}

// Integer arithmetic is retried in floating point once it overflows
macro_rules! op {
    ( $t: ident, $f: ident, $checked: ident ) => {
        impl $t for Number {
            type Output = Number;

            fn $f(self, rhs: Self) -> Self::Output {
                match (self, rhs) {
                    (Self::Int(l), Self::Int(r)) => match l.$checked(r) {
                        Some(v) => Self::Int(v),
                        None => Self::Float((l as f64).$f(r as f64)),
                    },
                    (l, r) => Self::Float(l.as_float().$f(r.as_float())),
                }
            }
        }
    };
}

op!(Add, add, checked_add);
op!(Sub, sub, checked_sub);
op!(Mul, mul, checked_mul);
