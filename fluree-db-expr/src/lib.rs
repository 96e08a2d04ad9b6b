//! # Fluree DB Expr
//!
//! SPARQL expression evaluation: runtime terms, type categories, operator
//! dispatch and the expression tree.
//!
//! This crate provides:
//! - [`Term`]: literals (typed or non-lexical), IRIs, blank nodes and variables
//! - [`categorize`]: total mapping from datatype IRI to a dispatch [`Category`]
//! - Operators with three dispatch strategies: fixed signature, overload
//!   table keyed by argument categories, and special operators that control
//!   their own argument evaluation
//! - [`Expression`]: the six-variant expression tree, built against an
//!   [`OperatorRegistry`] so operator names and arities are checked once
//! - [`Evaluator`]: async evaluation with FILTER, effective boolean value and
//!   aggregate entry points
//!
//! ## Example
//!
//! ```
//! use fluree_db_expr::{Evaluator, Expression, OperatorRegistry, SolutionMapping, Term};
//!
//! # futures::executor::block_on(async {
//! let registry = OperatorRegistry::builtins();
//! let expr = Expression::operator(
//!     registry,
//!     "+",
//!     vec![Expression::variable("x"), Expression::term(Term::integer(1))],
//! )
//! .unwrap();
//!
//! let row = SolutionMapping::new().with("x", Term::integer(41));
//! let value = Evaluator::default().evaluate(&expr, &row).await.unwrap();
//! assert_eq!(value, Term::integer(42));
//! # });
//! ```

pub mod aggregate;
pub mod binding;
mod builtins;
pub mod category;
pub mod config;
pub mod error;
pub mod eval;
pub mod expression;
pub mod operator;
pub mod term;
pub mod vocab;

pub use binding::{Bindings, SolutionMapping};
pub use category::{categorize, Category};
pub use config::{ErrorPolicy, EvaluatorConfig};
pub use error::{ArithmeticError, ErrorKind, ExprError, Result};
pub use eval::{CancellationFlag, Evaluator, ExistenceTest, ExtensionFunction};
pub use expression::{
    AggregateExpression, Aggregator, Algebra, Expression, ExpressionType,
};
pub use operator::{Arity, Operator, OperatorClass, OperatorRegistry};
pub use term::{ExternalTerm, Literal, LiteralValue, NonLexicalLiteral, Numeric, Term};
