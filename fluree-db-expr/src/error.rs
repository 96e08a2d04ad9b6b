//! Error types for expression construction and evaluation

use crate::category::{format_signature, Category};
use crate::operator::Arity;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur inside a numeric computation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArithmeticError {
    /// Division by zero
    #[error("division by zero")]
    DivideByZero,

    /// Integer overflow
    #[error("integer overflow")]
    Overflow,

    /// Operand without a numeric value
    #[error("type mismatch: cannot perform arithmetic on these types")]
    TypeMismatch,
}

/// Expression errors
///
/// Every variant is local to one expression or one binding; none of them
/// poison shared state. Use [`ExprError::kind`] to branch on the kind.
#[derive(Error, Debug, Clone)]
pub enum ExprError {
    /// Wrong number of argument expressions at construction
    #[error("{operator} expects {expected} argument(s), got {actual}")]
    Arity {
        operator: Arc<str>,
        expected: Arity,
        actual: usize,
    },

    /// Evaluated argument categories match no registered signature
    #[error("type mismatch: {operator} is not defined for {}", format_signature(.found))]
    TypeMismatch {
        operator: Arc<str>,
        found: Vec<Category>,
    },

    /// Effective boolean value is undefined for this category
    #[error("cannot compute the effective boolean value of a {0} term")]
    NotCoercible(Category),

    /// Operator or function name has no registered implementation
    #[error("no implementation registered for {0}")]
    Unimplemented(Arc<str>),

    /// Variable has no value in the current binding
    #[error("unbound variable ?{0}")]
    UnboundVariable(Arc<str>),

    /// Numeric computation failed
    #[error("arithmetic error in {operator}: {source}")]
    Arithmetic {
        operator: Arc<str>,
        #[source]
        source: ArithmeticError,
    },

    /// Argument has an accepted category but an unusable value
    #[error("invalid argument to {operator}: {message}")]
    InvalidArgument { operator: Arc<str>, message: String },

    /// Expression tree violates a construction invariant
    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    /// Failure reported by an external collaborator (existence test, extension function)
    #[error("external error: {0}")]
    External(String),

    /// Surrounding query execution was cancelled
    #[error("evaluation cancelled")]
    Cancelled,
}

/// Fieldless discriminant of [`ExprError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Arity,
    TypeMismatch,
    NotCoercible,
    Unimplemented,
    UnboundVariable,
    Arithmetic,
    InvalidArgument,
    InvalidExpression,
    External,
    Cancelled,
}

impl ExprError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExprError::Arity { .. } => ErrorKind::Arity,
            ExprError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ExprError::NotCoercible(_) => ErrorKind::NotCoercible,
            ExprError::Unimplemented(_) => ErrorKind::Unimplemented,
            ExprError::UnboundVariable(_) => ErrorKind::UnboundVariable,
            ExprError::Arithmetic { .. } => ErrorKind::Arithmetic,
            ExprError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            ExprError::InvalidExpression(_) => ErrorKind::InvalidExpression,
            ExprError::External(_) => ErrorKind::External,
            ExprError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// True for errors the query language treats as expression errors.
    ///
    /// These are the errors a FILTER turns into "binding rejected" and that
    /// `&&`, `||`, COALESCE and the aggregates are allowed to absorb. Everything
    /// else (construction bugs, external failures, cancellation) must reach
    /// the caller.
    pub fn is_query_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::TypeMismatch
                | ErrorKind::NotCoercible
                | ErrorKind::UnboundVariable
                | ErrorKind::Arithmetic
                | ErrorKind::InvalidArgument
        )
    }

    pub(crate) fn type_mismatch(operator: &str, found: impl Into<Vec<Category>>) -> Self {
        ExprError::TypeMismatch {
            operator: Arc::from(operator),
            found: found.into(),
        }
    }

    pub(crate) fn invalid_argument(operator: &str, message: impl Into<String>) -> Self {
        ExprError::InvalidArgument {
            operator: Arc::from(operator),
            message: message.into(),
        }
    }

    pub(crate) fn arithmetic(operator: &str, source: ArithmeticError) -> Self {
        ExprError::Arithmetic {
            operator: Arc::from(operator),
            source,
        }
    }
}

/// Result type for expression operations
pub type Result<T> = std::result::Result<T, ExprError>;
