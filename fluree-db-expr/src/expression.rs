//! Expression trees
//!
//! An [`Expression`] is built once per query compilation and is read-only
//! afterwards; the same tree can be evaluated concurrently against any number
//! of bindings. Operator nodes carry their resolved [`Operator`], so evaluation
//! never consults the registry.

use crate::error::{ExprError, Result};
use crate::operator::{Operator, OperatorClass, OperatorRegistry};
use crate::term::Term;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Discriminant of an [`Expression`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionType {
    Aggregate,
    Existence,
    NamedCall,
    Operator,
    Term,
    Variable,
}

/// Scalar or aggregate expression
#[derive(Debug, Clone)]
pub enum Expression {
    /// Aggregate over a group of solutions
    Aggregate(AggregateExpression),
    /// EXISTS / NOT EXISTS over a sub-pattern
    Existence(ExistenceExpression),
    /// Function call resolved by IRI
    NamedCall(NamedCallExpression),
    /// Operator call resolved through the registry
    Operator(OperatorExpression),
    /// Constant term
    Term(Term),
    /// Variable reference, bound at evaluation time
    Variable(Arc<str>),
}

/// Aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregator {
    Count,
    Sum,
    Min,
    Max,
    Avg,
    Sample,
    GroupConcat,
}

impl Aggregator {
    /// Parse an aggregate name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "count" => Some(Aggregator::Count),
            "sum" => Some(Aggregator::Sum),
            "min" => Some(Aggregator::Min),
            "max" => Some(Aggregator::Max),
            "avg" => Some(Aggregator::Avg),
            "sample" => Some(Aggregator::Sample),
            "group_concat" | "groupconcat" => Some(Aggregator::GroupConcat),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregator::Count => "count",
            Aggregator::Sum => "sum",
            Aggregator::Min => "min",
            Aggregator::Max => "max",
            Aggregator::Avg => "avg",
            Aggregator::Sample => "sample",
            Aggregator::GroupConcat => "group_concat",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AggregateExpression {
    aggregator: Aggregator,
    distinct: bool,
    separator: Option<Arc<str>>,
    expression: Box<Expression>,
}

impl AggregateExpression {
    /// Fails on a separator for anything but GROUP_CONCAT, or on a nested
    /// aggregate
    pub fn new(
        aggregator: Aggregator,
        distinct: bool,
        separator: Option<Arc<str>>,
        expression: Expression,
    ) -> Result<Self> {
        if separator.is_some() && aggregator != Aggregator::GroupConcat {
            return Err(ExprError::InvalidExpression(format!(
                "separator is only allowed on group_concat, not {}",
                aggregator.as_str()
            )));
        }
        if expression.contains_aggregate() {
            return Err(ExprError::InvalidExpression(
                "aggregates cannot be nested".to_string(),
            ));
        }
        Ok(Self {
            aggregator,
            distinct,
            separator,
            expression: Box::new(expression),
        })
    }

    pub fn aggregator(&self) -> Aggregator {
        self.aggregator
    }

    pub fn distinct(&self) -> bool {
        self.distinct
    }

    pub fn separator(&self) -> Option<&str> {
        self.separator.as_deref()
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }
}

/// Opaque sub-query handed to the existence test
///
/// The expression layer never looks inside; the [`ExistenceTest`] that built
/// the value downcasts it back.
///
/// [`ExistenceTest`]: crate::eval::ExistenceTest
#[derive(Clone)]
pub struct Algebra(Arc<dyn Any + Send + Sync>);

impl Algebra {
    pub fn new<T: Any + Send + Sync>(algebra: T) -> Self {
        Self(Arc::new(algebra))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Algebra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Algebra(..)")
    }
}

#[derive(Debug, Clone)]
pub struct ExistenceExpression {
    negated: bool,
    algebra: Algebra,
}

impl ExistenceExpression {
    pub fn new(negated: bool, algebra: Algebra) -> Self {
        Self { negated, algebra }
    }

    pub fn negated(&self) -> bool {
        self.negated
    }

    pub fn algebra(&self) -> &Algebra {
        &self.algebra
    }
}

#[derive(Debug, Clone)]
pub struct NamedCallExpression {
    name: Arc<str>,
    args: Vec<Expression>,
    function: Option<Operator>,
}

impl NamedCallExpression {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Expression] {
        &self.args
    }

    /// Registry function captured at construction; `None` means the call is
    /// left to the evaluator's extension functions
    pub fn function(&self) -> Option<&Operator> {
        self.function.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct OperatorExpression {
    operator: Operator,
    args: Vec<Expression>,
}

impl OperatorExpression {
    /// Fails with [`ExprError::Arity`] on a wrong argument count
    pub fn new(operator: Operator, args: Vec<Expression>) -> Result<Self> {
        operator.check_arity(args.len())?;
        Ok(Self { operator, args })
    }

    pub fn name(&self) -> &str {
        self.operator.name()
    }

    pub fn class(&self) -> OperatorClass {
        self.operator.class()
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    pub fn args(&self) -> &[Expression] {
        &self.args
    }
}

impl Expression {
    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn term(term: impl Into<Term>) -> Self {
        Expression::Term(term.into())
    }

    pub fn variable(name: impl Into<Arc<str>>) -> Self {
        Expression::Variable(name.into())
    }

    /// Resolve `name` in the registry and build an operator node
    pub fn operator(
        registry: &OperatorRegistry,
        name: &str,
        args: Vec<Expression>,
    ) -> Result<Self> {
        let operator = registry.resolve(name)?;
        Self::apply(operator, args)
    }

    /// Build an operator node from an already-resolved operator
    pub fn apply(operator: Operator, args: Vec<Expression>) -> Result<Self> {
        OperatorExpression::new(operator, args).map(Expression::Operator)
    }

    /// Build a function call by IRI.
    ///
    /// If the registry knows the IRI its arity is checked now; otherwise the
    /// call is resolved against extension functions at evaluation time.
    pub fn named_call(
        registry: &OperatorRegistry,
        name: impl Into<Arc<str>>,
        args: Vec<Expression>,
    ) -> Result<Self> {
        let name = name.into();
        let function = registry.function(&name).cloned();
        if let Some(op) = &function {
            op.check_arity(args.len())?;
        }
        Ok(Expression::NamedCall(NamedCallExpression {
            name,
            args,
            function,
        }))
    }

    pub fn exists(algebra: Algebra) -> Self {
        Expression::Existence(ExistenceExpression::new(false, algebra))
    }

    pub fn not_exists(algebra: Algebra) -> Self {
        Expression::Existence(ExistenceExpression::new(true, algebra))
    }

    pub fn aggregate(
        aggregator: Aggregator,
        distinct: bool,
        separator: Option<Arc<str>>,
        expression: Expression,
    ) -> Result<Self> {
        AggregateExpression::new(aggregator, distinct, separator, expression)
            .map(Expression::Aggregate)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn expression_type(&self) -> ExpressionType {
        match self {
            Expression::Aggregate(_) => ExpressionType::Aggregate,
            Expression::Existence(_) => ExpressionType::Existence,
            Expression::NamedCall(_) => ExpressionType::NamedCall,
            Expression::Operator(_) => ExpressionType::Operator,
            Expression::Term(_) => ExpressionType::Term,
            Expression::Variable(_) => ExpressionType::Variable,
        }
    }

    /// Direct sub-expressions
    pub fn children(&self) -> &[Expression] {
        match self {
            Expression::Aggregate(agg) => std::slice::from_ref(agg.expression.as_ref()),
            Expression::NamedCall(call) => &call.args,
            Expression::Operator(op) => &op.args,
            Expression::Existence(_) | Expression::Term(_) | Expression::Variable(_) => &[],
        }
    }

    /// Variables referenced by this expression, in first-seen order.
    ///
    /// Existence sub-queries are opaque and not searched.
    pub fn variables(&self) -> Vec<&str> {
        fn collect<'a>(expr: &'a Expression, out: &mut Vec<&'a str>) {
            if let Expression::Variable(name) = expr {
                if !out.contains(&name.as_ref()) {
                    out.push(name);
                }
            }
            for child in expr.children() {
                collect(child, out);
            }
        }
        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }

    /// True if an aggregate appears anywhere in the tree
    pub fn contains_aggregate(&self) -> bool {
        matches!(self, Expression::Aggregate(_))
            || self.children().iter().any(Expression::contains_aggregate)
    }
}

impl From<Term> for Expression {
    fn from(term: Term) -> Self {
        Expression::Term(term)
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expression]) -> fmt::Result {
    for arg in args {
        write!(f, " {}", arg)?;
    }
    Ok(())
}

/// SSE-style rendering, e.g. `(+ ?x "1"^^<...#integer>)`
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Term(term) => write!(f, "{}", term),
            Expression::Variable(name) => write!(f, "?{}", name),
            Expression::Operator(op) => {
                write!(f, "({}", op.name())?;
                write_args(f, &op.args)?;
                f.write_str(")")
            }
            Expression::NamedCall(call) => {
                write!(f, "(<{}>", call.name)?;
                write_args(f, &call.args)?;
                f.write_str(")")
            }
            Expression::Aggregate(agg) => {
                write!(f, "({}", agg.aggregator.as_str())?;
                if agg.distinct {
                    f.write_str(" distinct")?;
                }
                if let Some(sep) = &agg.separator {
                    write!(f, " (separator {:?})", sep)?;
                }
                write!(f, " {})", agg.expression)
            }
            Expression::Existence(ex) => {
                if ex.negated {
                    f.write_str("(notexists ..)")
                } else {
                    f.write_str("(exists ..)")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::operator::{computation, FixedOperator};

    fn add_registry() -> OperatorRegistry {
        let mut registry = OperatorRegistry::new();
        registry.register(FixedOperator::new(
            "+",
            vec![Category::Integer, Category::Integer],
            computation(|_| Ok(Term::integer(0))),
        ));
        registry
    }

    #[test]
    fn test_operator_arity_checked_at_construction() {
        let registry = add_registry();
        let err = Expression::operator(&registry, "+", vec![Expression::variable("x")]).unwrap_err();
        assert!(matches!(err, ExprError::Arity { actual: 1, .. }));
    }

    #[test]
    fn test_unknown_operator() {
        let registry = add_registry();
        assert!(matches!(
            Expression::operator(&registry, "frobnicate", vec![]),
            Err(ExprError::Unimplemented(_))
        ));
    }

    #[test]
    fn test_expression_type_and_variables() {
        let registry = add_registry();
        let expr = Expression::operator(
            &registry,
            "+",
            vec![Expression::variable("x"), Expression::variable("x")],
        )
        .unwrap();
        assert_eq!(expr.expression_type(), ExpressionType::Operator);
        assert_eq!(expr.variables(), vec!["x"]);
        let Expression::Operator(op) = &expr else {
            panic!("expected operator");
        };
        assert_eq!(op.class(), OperatorClass::Fixed);
        assert_eq!(expr.to_string(), "(+ ?x ?x)");
    }

    #[test]
    fn test_separator_only_on_group_concat() {
        let inner = Expression::variable("x");
        assert!(Expression::aggregate(
            Aggregator::GroupConcat,
            false,
            Some(Arc::from(",")),
            inner.clone()
        )
        .is_ok());
        assert!(matches!(
            Expression::aggregate(Aggregator::Sum, false, Some(Arc::from(",")), inner),
            Err(ExprError::InvalidExpression(_))
        ));
    }

    #[test]
    fn test_nested_aggregate_rejected() {
        let inner =
            Expression::aggregate(Aggregator::Count, false, None, Expression::variable("x")).unwrap();
        assert!(inner.contains_aggregate());
        assert!(Expression::aggregate(Aggregator::Max, false, None, inner).is_err());
    }

    #[test]
    fn test_named_call_without_registry_entry() {
        let registry = OperatorRegistry::new();
        let expr = Expression::named_call(&registry, "http://ex.org/fn", vec![]).unwrap();
        let Expression::NamedCall(call) = &expr else {
            panic!("expected named call");
        };
        assert!(call.function().is_none());
        assert_eq!(expr.to_string(), "(<http://ex.org/fn>)");
    }

    #[test]
    fn test_algebra_downcast() {
        #[derive(Debug, PartialEq)]
        struct Bgp(&'static str);
        let expr = Expression::not_exists(Algebra::new(Bgp("?s ?p ?o")));
        let Expression::Existence(ex) = &expr else {
            panic!("expected existence");
        };
        assert!(ex.negated());
        assert_eq!(ex.algebra().downcast_ref::<Bgp>(), Some(&Bgp("?s ?p ?o")));
        assert!(ex.algebra().downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_aggregator_parse() {
        assert_eq!(Aggregator::parse("GROUP_CONCAT"), Some(Aggregator::GroupConcat));
        assert_eq!(Aggregator::parse("median"), None);
    }
}
