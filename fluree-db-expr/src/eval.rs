//! Expression evaluation
//!
//! [`Evaluator`] walks an [`Expression`] against one set of bindings and
//! produces a [`Term`]. Arguments of fixed, overloaded and named calls are
//! evaluated strictly left to right and evaluation stops at the first error.
//! Special operators receive the evaluator itself and choose their own order.
//!
//! Evaluation only suspends inside special operators, extension functions and
//! existence tests. The [`CancellationFlag`] is checked before each node and
//! after each node completes, so a cancelled evaluation returns
//! [`ExprError::Cancelled`] and never a partial term.

use crate::binding::Bindings;
use crate::config::{ErrorPolicy, EvaluatorConfig};
use crate::error::{ExprError, Result};
use crate::expression::{Algebra, Expression, NamedCallExpression};
use crate::operator::{Evaluate, Operator};
use crate::term::Term;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use futures::future::BoxFuture;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Function called by IRI that is not in the operator registry
#[async_trait]
pub trait ExtensionFunction: Send + Sync {
    async fn call(&self, args: &[Term]) -> Result<Term>;
}

/// Sub-query test behind EXISTS and NOT EXISTS
#[async_trait]
pub trait ExistenceTest: Send + Sync {
    /// Whether `algebra` has at least one solution compatible with `bindings`
    async fn has_match(&self, algebra: &Algebra, bindings: &dyn Bindings) -> Result<bool>;
}

/// Shared cancellation signal
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct Evaluator {
    config: EvaluatorConfig,
    now: DateTime<FixedOffset>,
    extensions: FxHashMap<Arc<str>, Arc<dyn ExtensionFunction>>,
    existence: Option<Arc<dyn ExistenceTest>>,
    cancellation: CancellationFlag,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EvaluatorConfig::default())
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("config", &self.config)
            .field("now", &self.now)
            .field("extensions", &self.extensions.len())
            .field("existence", &self.existence.is_some())
            .finish()
    }
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        let now = config.now.unwrap_or_else(|| Utc::now().into());
        Self {
            config,
            now,
            extensions: FxHashMap::default(),
            existence: None,
            cancellation: CancellationFlag::new(),
        }
    }

    /// Register a function for `NamedCall`s the registry does not resolve
    pub fn with_extension(
        mut self,
        iri: impl Into<Arc<str>>,
        function: impl ExtensionFunction + 'static,
    ) -> Self {
        self.extensions.insert(iri.into(), Arc::new(function));
        self
    }

    pub fn with_existence_test(mut self, test: impl ExistenceTest + 'static) -> Self {
        self.existence = Some(Arc::new(test));
        self
    }

    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = flag;
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancellation
    }

    /// Evaluate a scalar expression
    pub async fn evaluate(&self, expr: &Expression, bindings: &dyn Bindings) -> Result<Term> {
        self.eval_expression(expr, bindings).await
    }

    /// Evaluate and coerce to the effective boolean value
    pub async fn evaluate_as_ebv(&self, expr: &Expression, bindings: &dyn Bindings) -> Result<bool> {
        self.eval_expression(expr, bindings)
            .await?
            .effective_boolean_value()
    }

    /// FILTER semantics.
    ///
    /// With [`ErrorPolicy::Exclude`] a query error rejects the binding
    /// (`Ok(false)`); other errors are always returned.
    pub async fn filter(&self, expr: &Expression, bindings: &dyn Bindings) -> Result<bool> {
        match self.evaluate_as_ebv(expr, bindings).await {
            Err(e) if e.is_query_error() && self.config.filter_errors == ErrorPolicy::Exclude => {
                tracing::debug!(error = %e, "filter expression error, binding excluded");
                Ok(false)
            }
            other => other,
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancellation.is_cancelled() {
            Err(ExprError::Cancelled)
        } else {
            Ok(())
        }
    }

    pub(crate) fn eval_expression<'a>(
        &'a self,
        expr: &'a Expression,
        bindings: &'a dyn Bindings,
    ) -> BoxFuture<'a, Result<Term>> {
        Box::pin(async move {
            self.check_cancelled()?;
            let term = match expr {
                Expression::Term(term) => term.clone(),
                Expression::Variable(name) => bindings
                    .resolve(name)
                    .ok_or_else(|| ExprError::UnboundVariable(name.clone()))?,
                Expression::Operator(op) => {
                    self.apply(op.operator(), op.args(), bindings).await?
                }
                Expression::NamedCall(call) => self.eval_named_call(call, bindings).await?,
                Expression::Existence(ex) => {
                    let test = self
                        .existence
                        .as_ref()
                        .ok_or_else(|| ExprError::Unimplemented(Arc::from("exists")))?;
                    let found = test.has_match(ex.algebra(), bindings).await?;
                    Term::boolean(found != ex.negated())
                }
                Expression::Aggregate(agg) => {
                    return Err(ExprError::InvalidExpression(format!(
                        "{} aggregate outside of a group",
                        agg.aggregator().as_str()
                    )))
                }
            };
            self.check_cancelled()?;
            Ok(term)
        })
    }

    async fn apply(
        &self,
        operator: &Operator,
        args: &[Expression],
        bindings: &dyn Bindings,
    ) -> Result<Term> {
        match operator {
            Operator::Special(special) => special.apply(args, bindings, self).await,
            _ => {
                let values = self.eval_args(args, bindings).await?;
                operator.apply_evaluated(&values)
            }
        }
    }

    async fn eval_args(&self, args: &[Expression], bindings: &dyn Bindings) -> Result<Vec<Term>> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expression(arg, bindings).await?);
        }
        Ok(values)
    }

    async fn eval_named_call(
        &self,
        call: &NamedCallExpression,
        bindings: &dyn Bindings,
    ) -> Result<Term> {
        if let Some(function) = call.function() {
            return self.apply(function, call.args(), bindings).await;
        }
        match self.extensions.get(call.name()) {
            Some(extension) => {
                let values = self.eval_args(call.args(), bindings).await?;
                extension.call(&values).await
            }
            None => {
                tracing::trace!(function = call.name(), "no extension function registered");
                Err(ExprError::Unimplemented(Arc::from(call.name())))
            }
        }
    }
}

#[async_trait]
impl Evaluate for Evaluator {
    async fn evaluate(&self, expr: &Expression, bindings: &dyn Bindings) -> Result<Term> {
        self.eval_expression(expr, bindings).await
    }

    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }
}
