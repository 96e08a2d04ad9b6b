//! Aggregate evaluation
//!
//! An aggregate is evaluated over one group of solutions. The inner
//! expression is evaluated once per solution; solutions where it raises a
//! query error (an unbound variable, a type mismatch) contribute nothing.

use crate::binding::Bindings;
use crate::builtins::compare::term_order;
use crate::builtins::numeric::ArithmeticOp;
use crate::builtins::{lexical_arg, numeric_arg};
use crate::error::{ExprError, Result};
use crate::eval::Evaluator;
use crate::expression::{AggregateExpression, Aggregator};
use crate::term::{Literal, Numeric, Term};
use num_bigint::BigInt;
use num_traits::Zero;
use rustc_hash::FxHashSet;
use tracing::Instrument;

impl Evaluator {
    /// Evaluate `agg` over a group.
    ///
    /// Returns `Ok(None)` when MIN, MAX or SAMPLE have no input. SUM and AVG
    /// of an empty group are `0`.
    pub async fn evaluate_aggregate<B: Bindings>(
        &self,
        agg: &AggregateExpression,
        solutions: &[B],
    ) -> Result<Option<Term>> {
        let span = tracing::debug_span!(
            "aggregate",
            aggregator = agg.aggregator().as_str(),
            distinct = agg.distinct(),
            solutions = solutions.len()
        );
        async move {
            let mut values = Vec::with_capacity(solutions.len());
            for solution in solutions {
                match self.eval_expression(agg.expression(), solution).await {
                    Ok(term) => values.push(term),
                    Err(e) if e.is_query_error() => {
                        tracing::trace!(error = %e, "aggregate input skipped");
                    }
                    Err(e) => return Err(e),
                }
            }
            if agg.distinct() {
                let mut seen = FxHashSet::default();
                values.retain(|term| seen.insert(term.to_external_term()));
            }
            let separator = agg
                .separator()
                .unwrap_or(&self.config().group_concat_separator);
            fold(agg.aggregator(), values, separator)
        }
        .instrument(span)
        .await
    }
}

fn sum(values: &[Term]) -> Result<Numeric> {
    values
        .iter()
        .try_fold(Numeric::Integer(BigInt::zero()), |acc, term| {
            let n = numeric_arg("sum", term)?;
            ArithmeticOp::Add
                .apply(&acc, n)
                .map_err(|e| ExprError::arithmetic("sum", e))
        })
}

fn fold(aggregator: Aggregator, values: Vec<Term>, separator: &str) -> Result<Option<Term>> {
    match aggregator {
        Aggregator::Count => Ok(Some(Term::integer(values.len() as i64))),
        Aggregator::Sum => Ok(Some(Literal::numeric(sum(&values)?).into())),
        Aggregator::Avg => {
            if values.is_empty() {
                return Ok(Some(Term::integer(0)));
            }
            let count = Numeric::Integer(BigInt::from(values.len()));
            let avg = ArithmeticOp::Div
                .apply(&sum(&values)?, &count)
                .map_err(|e| ExprError::arithmetic("avg", e))?;
            Ok(Some(Literal::numeric(avg).into()))
        }
        Aggregator::Min => Ok(values.into_iter().min_by(term_order)),
        Aggregator::Max => Ok(values.into_iter().max_by(term_order)),
        Aggregator::Sample => Ok(values.into_iter().next()),
        Aggregator::GroupConcat => {
            let parts = values
                .iter()
                .map(|term| lexical_arg("group_concat", term))
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(Term::string(parts.join(separator))))
        }
    }
}
