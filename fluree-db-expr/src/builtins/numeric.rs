//! Numeric operators
//!
//! Binary operators promote both operands to the wider of the two types
//! (integer → decimal → float → double) before computing. Dividing two
//! integers yields a decimal. Float and double arithmetic follows IEEE, so
//! dividing by zero there produces INF or NaN rather than an error.

use super::numeric_arg;
use crate::category::Category;
use crate::error::{ArithmeticError, ExprError, Result};
use crate::operator::{computation, OperatorRegistry, OverloadOperator};
use crate::term::{Literal, Numeric, Term};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use std::cmp::Ordering;

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Operands converted to a common representation
enum Promoted {
    Integer(BigInt, BigInt),
    Decimal(BigDecimal, BigDecimal),
    Float(f32, f32),
    Double(f64, f64),
}

fn f64_of(n: &Numeric) -> std::result::Result<f64, ArithmeticError> {
    to_f64(n).ok_or(ArithmeticError::TypeMismatch)
}

fn decimal_of(n: &Numeric) -> std::result::Result<BigDecimal, ArithmeticError> {
    to_decimal(n).ok_or(ArithmeticError::TypeMismatch)
}

fn promote(left: &Numeric, right: &Numeric) -> std::result::Result<Promoted, ArithmeticError> {
    Ok(match (left, right) {
        (Numeric::Integer(a), Numeric::Integer(b)) => Promoted::Integer(a.clone(), b.clone()),
        (Numeric::Double(_), _) | (_, Numeric::Double(_)) => {
            Promoted::Double(f64_of(left)?, f64_of(right)?)
        }
        (Numeric::Float(_), _) | (_, Numeric::Float(_)) => {
            Promoted::Float(f64_of(left)? as f32, f64_of(right)? as f32)
        }
        _ => Promoted::Decimal(decimal_of(left)?, decimal_of(right)?),
    })
}

/// Exact decimal value; `None` for non-finite floats
pub(crate) fn to_decimal(n: &Numeric) -> Option<BigDecimal> {
    match n {
        Numeric::Integer(i) => Some(BigDecimal::new(i.clone(), 0)),
        Numeric::Decimal(d) => Some(d.clone()),
        Numeric::Float(f) => BigDecimal::try_from(*f as f64).ok(),
        Numeric::Double(d) => BigDecimal::try_from(*d).ok(),
    }
}

pub(crate) fn to_f64(n: &Numeric) -> Option<f64> {
    match n {
        Numeric::Integer(i) => i.to_f64(),
        Numeric::Decimal(d) => d.to_f64(),
        Numeric::Float(f) => Some(*f as f64),
        Numeric::Double(d) => Some(*d),
    }
}

impl ArithmeticOp {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
        }
    }

    /// Apply this operator after numeric promotion.
    ///
    /// # Errors
    ///
    /// - `DivideByZero` for integer or decimal division by zero
    /// - `TypeMismatch` when a non-finite float must become a decimal
    pub(crate) fn apply(
        self,
        left: &Numeric,
        right: &Numeric,
    ) -> std::result::Result<Numeric, ArithmeticError> {
        match promote(left, right)? {
            Promoted::Integer(a, b) => match self {
                ArithmeticOp::Add => Ok(Numeric::Integer(a + b)),
                ArithmeticOp::Sub => Ok(Numeric::Integer(a - b)),
                ArithmeticOp::Mul => Ok(Numeric::Integer(a * b)),
                ArithmeticOp::Div => {
                    if b.is_zero() {
                        return Err(ArithmeticError::DivideByZero);
                    }
                    Ok(Numeric::Decimal(
                        BigDecimal::new(a, 0) / BigDecimal::new(b, 0),
                    ))
                }
            },
            Promoted::Decimal(a, b) => match self {
                ArithmeticOp::Add => Ok(Numeric::Decimal(a + b)),
                ArithmeticOp::Sub => Ok(Numeric::Decimal(a - b)),
                ArithmeticOp::Mul => Ok(Numeric::Decimal(a * b)),
                ArithmeticOp::Div => {
                    if b.is_zero() {
                        return Err(ArithmeticError::DivideByZero);
                    }
                    Ok(Numeric::Decimal(a / b))
                }
            },
            Promoted::Float(a, b) => Ok(Numeric::Float(match self {
                ArithmeticOp::Add => a + b,
                ArithmeticOp::Sub => a - b,
                ArithmeticOp::Mul => a * b,
                ArithmeticOp::Div => a / b,
            })),
            Promoted::Double(a, b) => Ok(Numeric::Double(match self {
                ArithmeticOp::Add => a + b,
                ArithmeticOp::Sub => a - b,
                ArithmeticOp::Mul => a * b,
                ArithmeticOp::Div => a / b,
            })),
        }
    }
}

/// Numeric ordering after promotion; `None` if either side is NaN
pub(crate) fn compare_numeric(left: &Numeric, right: &Numeric) -> Option<Ordering> {
    match promote(left, right).ok()? {
        Promoted::Integer(a, b) => Some(a.cmp(&b)),
        Promoted::Decimal(a, b) => Some(a.cmp(&b)),
        Promoted::Float(a, b) => a.partial_cmp(&b),
        Promoted::Double(a, b) => a.partial_cmp(&b),
    }
}

fn negate(n: &Numeric) -> Numeric {
    match n {
        Numeric::Integer(i) => Numeric::Integer(-i.clone()),
        Numeric::Decimal(d) => Numeric::Decimal(-d.clone()),
        Numeric::Float(f) => Numeric::Float(-f),
        Numeric::Double(d) => Numeric::Double(-d),
    }
}

fn identity(n: &Numeric) -> Numeric {
    n.clone()
}

fn abs(n: &Numeric) -> Numeric {
    match n {
        Numeric::Integer(i) => Numeric::Integer(i.abs()),
        Numeric::Decimal(d) => Numeric::Decimal(d.abs()),
        Numeric::Float(f) => Numeric::Float(f.abs()),
        Numeric::Double(d) => Numeric::Double(d.abs()),
    }
}

// with_scale(0) truncates toward zero
fn decimal_floor(d: &BigDecimal) -> BigDecimal {
    let t = d.with_scale(0);
    if &t > d {
        t - BigDecimal::from(1)
    } else {
        t
    }
}

fn decimal_ceil(d: &BigDecimal) -> BigDecimal {
    let t = d.with_scale(0);
    if &t < d {
        t + BigDecimal::from(1)
    } else {
        t
    }
}

fn ceil(n: &Numeric) -> Numeric {
    match n {
        Numeric::Integer(_) => n.clone(),
        Numeric::Decimal(d) => Numeric::Decimal(decimal_ceil(d)),
        Numeric::Float(f) => Numeric::Float(f.ceil()),
        Numeric::Double(d) => Numeric::Double(d.ceil()),
    }
}

fn floor(n: &Numeric) -> Numeric {
    match n {
        Numeric::Integer(_) => n.clone(),
        Numeric::Decimal(d) => Numeric::Decimal(decimal_floor(d)),
        Numeric::Float(f) => Numeric::Float(f.floor()),
        Numeric::Double(d) => Numeric::Double(d.floor()),
    }
}

/// Halves round toward positive infinity (`ROUND(-2.5)` is `-2`)
fn round_half_up(x: f64) -> f64 {
    if x.fract() == -0.5 {
        x.ceil()
    } else {
        x.round()
    }
}

fn round(n: &Numeric) -> Numeric {
    match n {
        Numeric::Integer(_) => n.clone(),
        Numeric::Decimal(d) => {
            Numeric::Decimal(decimal_floor(&(d.clone() + BigDecimal::new(BigInt::from(5), 1))))
        }
        Numeric::Float(f) => Numeric::Float(round_half_up(*f as f64) as f32),
        Numeric::Double(d) => Numeric::Double(round_half_up(*d)),
    }
}

fn binary(op: ArithmeticOp, args: &[Term]) -> Result<Term> {
    let left = numeric_arg(op.symbol(), &args[0])?;
    let right = numeric_arg(op.symbol(), &args[1])?;
    op.apply(left, right)
        .map(|n| Term::from(Literal::numeric(n)))
        .map_err(|e| ExprError::arithmetic(op.symbol(), e))
}

fn unary(name: &'static str, f: fn(&Numeric) -> Numeric) -> Result<OverloadOperator> {
    OverloadOperator::builder(name, 1)
        .on_each(
            &[Category::NUMERIC],
            computation(move |args| {
                let n = numeric_arg(name, &args[0])?;
                Ok(Literal::numeric(f(n)).into())
            }),
        )
        .build()
}

pub(super) fn register(registry: &mut OperatorRegistry) -> Result<()> {
    for op in [
        ArithmeticOp::Add,
        ArithmeticOp::Sub,
        ArithmeticOp::Mul,
        ArithmeticOp::Div,
    ] {
        registry.register(
            OverloadOperator::builder(op.symbol(), 2)
                .on_each(
                    &[Category::NUMERIC, Category::NUMERIC],
                    computation(move |args| binary(op, args)),
                )
                .build()?,
        );
    }
    registry.register(unary("uminus", negate)?);
    registry.register(unary("uplus", identity)?);
    registry.register(unary("abs", abs)?);
    registry.register(unary("ceil", ceil)?);
    registry.register(unary("floor", floor)?);
    registry.register(unary("round", round)?);
    Ok(())
}
