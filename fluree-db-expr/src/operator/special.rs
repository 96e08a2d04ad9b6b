//! Special (context-aware) operators

use super::Arity;
use crate::binding::Bindings;
use crate::error::Result;
use crate::expression::Expression;
use crate::term::Term;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

/// Recursive evaluation capability handed to special operators
///
/// The evaluator passes itself in; special operators never reach for a global
/// evaluator. Every call may suspend.
#[async_trait]
pub trait Evaluate: Send + Sync {
    /// Evaluate one sub-expression against a binding
    async fn evaluate(&self, expr: &Expression, bindings: &dyn Bindings) -> Result<Term>;

    /// Query-wide value of NOW()
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Operator that controls the evaluation of its own arguments
///
/// Used for short-circuit logic (`&&`, `||`), conditionals (IF, COALESCE),
/// variable inspection (BOUND) and anything else that cannot be a pure
/// function of evaluated arguments.
#[async_trait]
pub trait SpecialOperator: Send + Sync {
    fn name(&self) -> &str;

    fn arity(&self) -> Arity;

    async fn apply(
        &self,
        args: &[Expression],
        bindings: &dyn Bindings,
        evaluate: &dyn Evaluate,
    ) -> Result<Term>;
}
