//! Operator dispatch
//!
//! An operator name resolves, once per query compilation, to one of three
//! dispatch strategies:
//!
//! - [`FixedOperator`]: one exact argument-category signature
//! - [`OverloadOperator`]: a table from category tuples to computations
//! - [`SpecialOperator`]: receives unevaluated arguments, the binding and the
//!   recursive evaluator, and decides its own evaluation order
//!
//! Fixed and overloaded operators only ever see already-evaluated terms.

mod fixed;
mod overload;
mod registry;
mod special;

pub use fixed::FixedOperator;
pub use overload::{OverloadBuilder, OverloadOperator};
pub use registry::OperatorRegistry;
pub use special::{Evaluate, SpecialOperator};

use crate::error::{ExprError, Result};
use crate::term::Term;
use std::fmt;
use std::sync::Arc;

/// Computation behind a fixed or overloaded operator
pub type Computation = Arc<dyn Fn(&[Term]) -> Result<Term> + Send + Sync>;

/// Wrap a closure as a [`Computation`]
pub fn computation<F>(f: F) -> Computation
where
    F: Fn(&[Term]) -> Result<Term> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Number of argument expressions an operator accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Between(usize, usize),
}

impl Arity {
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Arity::Exact(k) => n == k,
            Arity::AtLeast(min) => n >= min,
            Arity::Between(min, max) => (min..=max).contains(&n),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(k) => write!(f, "exactly {}", k),
            Arity::AtLeast(min) => write!(f, "at least {}", min),
            Arity::Between(min, max) => write!(f, "between {} and {}", min, max),
        }
    }
}

/// Dispatch strategy discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorClass {
    Fixed,
    Overloaded,
    Special,
}

/// A resolved operator
#[derive(Clone)]
pub enum Operator {
    Fixed(Arc<FixedOperator>),
    Overloaded(Arc<OverloadOperator>),
    Special(Arc<dyn SpecialOperator>),
}

impl Operator {
    pub fn name(&self) -> &str {
        match self {
            Operator::Fixed(op) => op.name(),
            Operator::Overloaded(op) => op.name(),
            Operator::Special(op) => op.name(),
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operator::Fixed(op) => op.arity(),
            Operator::Overloaded(op) => op.arity(),
            Operator::Special(op) => op.arity(),
        }
    }

    pub fn class(&self) -> OperatorClass {
        match self {
            Operator::Fixed(_) => OperatorClass::Fixed,
            Operator::Overloaded(_) => OperatorClass::Overloaded,
            Operator::Special(_) => OperatorClass::Special,
        }
    }

    /// Fail with [`ExprError::Arity`] unless `n` arguments are accepted
    pub fn check_arity(&self, n: usize) -> Result<()> {
        check_arity(self.name(), self.arity(), n)
    }

    /// Apply a fixed or overloaded operator to evaluated arguments.
    ///
    /// Special operators need their unevaluated arguments and are rejected here.
    pub fn apply_evaluated(&self, args: &[Term]) -> Result<Term> {
        match self {
            Operator::Fixed(op) => op.apply(args),
            Operator::Overloaded(op) => op.apply(args),
            Operator::Special(op) => Err(ExprError::InvalidExpression(format!(
                "special operator {} cannot be applied to evaluated arguments",
                op.name()
            ))),
        }
    }
}

impl From<FixedOperator> for Operator {
    fn from(op: FixedOperator) -> Self {
        Operator::Fixed(Arc::new(op))
    }
}

impl From<OverloadOperator> for Operator {
    fn from(op: OverloadOperator) -> Self {
        Operator::Overloaded(Arc::new(op))
    }
}

impl Operator {
    pub fn special(op: impl SpecialOperator + 'static) -> Self {
        Operator::Special(Arc::new(op))
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("name", &self.name())
            .field("class", &self.class())
            .field("arity", &self.arity())
            .finish()
    }
}

pub(crate) fn check_arity(name: &str, arity: Arity, actual: usize) -> Result<()> {
    if arity.accepts(actual) {
        Ok(())
    } else {
        Err(ExprError::Arity {
            operator: Arc::from(name),
            expected: arity,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_accepts() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(3));
        assert!(Arity::AtLeast(1).accepts(5));
        assert!(!Arity::AtLeast(1).accepts(0));
        assert!(Arity::Between(2, 3).accepts(3));
        assert!(!Arity::Between(2, 3).accepts(1));
    }

    #[test]
    fn test_check_arity_error() {
        let err = check_arity("bnode", Arity::Exact(0), 1).unwrap_err();
        assert!(matches!(
            err,
            ExprError::Arity {
                expected: Arity::Exact(0),
                actual: 1,
                ..
            }
        ));
    }
}
