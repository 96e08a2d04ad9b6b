//! Logical and conditional operators
//!
//! Everything here except `!` is a special operator: it receives its
//! argument expressions unevaluated and evaluates them left to right,
//! stopping as soon as the result is known.

use super::compare::equal_terms;
use crate::binding::Bindings;
use crate::category::Category;
use crate::error::{ExprError, Result};
use crate::expression::Expression;
use crate::operator::{
    check_arity, computation, Arity, Evaluate, Operator, OperatorRegistry, OverloadOperator,
    SpecialOperator,
};
use crate::term::temporal::DateTime;
use crate::term::{Literal, Term};
use async_trait::async_trait;

/// `&&` and `||` with SPARQL error semantics.
///
/// A query error in one operand is deferred: `error || true` is `true` and
/// `error && false` is `false`. If no operand decides the result, the first
/// deferred error is returned.
struct Connective {
    name: &'static str,
    /// Operand value that decides the result on its own
    decisive: bool,
}

const AND: Connective = Connective {
    name: "&&",
    decisive: false,
};

const OR: Connective = Connective {
    name: "||",
    decisive: true,
};

#[async_trait]
impl SpecialOperator for Connective {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> Arity {
        Arity::AtLeast(2)
    }

    async fn apply(
        &self,
        args: &[Expression],
        bindings: &dyn Bindings,
        evaluate: &dyn Evaluate,
    ) -> Result<Term> {
        check_arity(self.name(), self.arity(), args.len())?;
        let mut deferred: Option<ExprError> = None;
        for arg in args {
            let outcome = match evaluate.evaluate(arg, bindings).await {
                Ok(term) => term.effective_boolean_value(),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(b) if b == self.decisive => return Ok(Term::boolean(b)),
                Ok(_) => {}
                Err(e) if e.is_query_error() => {
                    deferred.get_or_insert(e);
                }
                Err(e) => return Err(e),
            }
        }
        match deferred {
            Some(e) => Err(e),
            None => Ok(Term::boolean(!self.decisive)),
        }
    }
}

struct If;

#[async_trait]
impl SpecialOperator for If {
    fn name(&self) -> &str {
        "if"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(3)
    }

    async fn apply(
        &self,
        args: &[Expression],
        bindings: &dyn Bindings,
        evaluate: &dyn Evaluate,
    ) -> Result<Term> {
        check_arity(self.name(), self.arity(), args.len())?;
        let condition = evaluate
            .evaluate(&args[0], bindings)
            .await?
            .effective_boolean_value()?;
        let branch = if condition { &args[1] } else { &args[2] };
        evaluate.evaluate(branch, bindings).await
    }
}

/// First argument that evaluates without a query error
struct Coalesce;

#[async_trait]
impl SpecialOperator for Coalesce {
    fn name(&self) -> &str {
        "coalesce"
    }

    fn arity(&self) -> Arity {
        Arity::AtLeast(0)
    }

    async fn apply(
        &self,
        args: &[Expression],
        bindings: &dyn Bindings,
        evaluate: &dyn Evaluate,
    ) -> Result<Term> {
        let mut last = None;
        for arg in args {
            match evaluate.evaluate(arg, bindings).await {
                Ok(term) => return Ok(term),
                Err(e) if e.is_query_error() => last = Some(e),
                Err(e) => return Err(e),
            }
        }
        Err(last.unwrap_or_else(|| {
            ExprError::invalid_argument("coalesce", "no argument produced a value")
        }))
    }
}

struct Bound;

#[async_trait]
impl SpecialOperator for Bound {
    fn name(&self) -> &str {
        "bound"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    async fn apply(
        &self,
        args: &[Expression],
        bindings: &dyn Bindings,
        _evaluate: &dyn Evaluate,
    ) -> Result<Term> {
        check_arity(self.name(), self.arity(), args.len())?;
        match &args[0] {
            Expression::Variable(name) => Ok(Term::boolean(bindings.resolve(name).is_some())),
            other => Err(ExprError::InvalidExpression(format!(
                "bound expects a variable, got {}",
                other
            ))),
        }
    }
}

/// IN and NOT IN
///
/// Candidates are compared with `=` semantics, in order, until one matches.
struct Membership {
    name: &'static str,
    negated: bool,
}

#[async_trait]
impl SpecialOperator for Membership {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }

    async fn apply(
        &self,
        args: &[Expression],
        bindings: &dyn Bindings,
        evaluate: &dyn Evaluate,
    ) -> Result<Term> {
        check_arity(self.name(), self.arity(), args.len())?;
        let needle = evaluate.evaluate(&args[0], bindings).await?;
        let mut deferred: Option<ExprError> = None;
        for candidate in &args[1..] {
            match evaluate.evaluate(candidate, bindings).await {
                Ok(term) => match equal_terms(&needle, &term) {
                    Some(true) => return Ok(Term::boolean(!self.negated)),
                    Some(false) => {}
                    None => {
                        deferred.get_or_insert_with(|| {
                            ExprError::type_mismatch(
                                self.name,
                                [needle.category(), term.category()],
                            )
                        });
                    }
                },
                Err(e) if e.is_query_error() => {
                    deferred.get_or_insert(e);
                }
                Err(e) => return Err(e),
            }
        }
        match deferred {
            Some(e) => Err(e),
            None => Ok(Term::boolean(self.negated)),
        }
    }
}

/// NOW(): the same instant for every call in one evaluator
struct Now;

#[async_trait]
impl SpecialOperator for Now {
    fn name(&self) -> &str {
        "now"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }

    async fn apply(
        &self,
        args: &[Expression],
        _bindings: &dyn Bindings,
        evaluate: &dyn Evaluate,
    ) -> Result<Term> {
        check_arity(self.name(), self.arity(), args.len())?;
        Ok(Literal::date_time(DateTime::from_chrono(evaluate.now())).into())
    }
}

pub(super) fn register(registry: &mut OperatorRegistry) -> Result<()> {
    registry
        .register(Operator::special(AND))
        .register(Operator::special(OR))
        .register(Operator::special(If))
        .register(Operator::special(Coalesce))
        .register(Operator::special(Bound))
        .register(Operator::special(Membership {
            name: "in",
            negated: false,
        }))
        .register(Operator::special(Membership {
            name: "notin",
            negated: true,
        }))
        .register(Operator::special(Now));
    registry.register(
        OverloadOperator::builder("!", 1)
            .on_each(
                &[Category::TERMS],
                computation(|args| Ok(Term::boolean(!args[0].effective_boolean_value()?))),
            )
            .build()?,
    );
    Ok(())
}
