//! Built-in SPARQL operators and functions
//!
//! # Module Structure
//!
//! - `numeric`: arithmetic with numeric promotion, ABS/CEIL/FLOOR/ROUND
//! - `compare`: `=`, `!=`, `<`, `<=`, `>`, `>=` and term ordering
//! - `logical`: `&&`, `||`, `!`, IF, COALESCE, BOUND, IN, NOT IN, NOW
//! - `string`: STRLEN, UCASE, LCASE, CONTAINS, STRSTARTS, STRENDS
//! - `terms`: STR, LANG, DATATYPE, the `is*` tests, sameTerm, BNODE, STRLANG,
//!   STRDT, LANGMATCHES, IRI
//! - `cast`: XSD constructor functions, called by IRI
//! - `datetime`: YEAR through SECONDS

mod cast;
pub(crate) mod compare;
mod datetime;
mod logical;
pub(crate) mod numeric;
mod string;
mod terms;

use crate::error::{ExprError, Result};
use crate::operator::OperatorRegistry;
use crate::term::{Numeric, Term};
use std::borrow::Cow;

type Installer = fn(&mut OperatorRegistry) -> Result<()>;

/// Install every built-in into `registry`
pub(crate) fn register(registry: &mut OperatorRegistry) {
    let groups: [(&str, Installer); 7] = [
        ("numeric", numeric::register),
        ("compare", compare::register),
        ("logical", logical::register),
        ("string", string::register),
        ("terms", terms::register),
        ("cast", cast::register),
        ("datetime", datetime::register),
    ];
    for (group, install) in groups {
        if let Err(e) = install(registry) {
            tracing::error!(group, error = %e, "failed to register built-in operators");
        }
    }
}

/// Numeric value of an argument the overload table already accepted
pub(crate) fn numeric_arg<'a>(operator: &str, term: &'a Term) -> Result<&'a Numeric> {
    term.as_literal()
        .and_then(|lit| lit.as_numeric())
        .ok_or_else(|| ExprError::type_mismatch(operator, [term.category()]))
}

/// Lexical form of a literal or IRI argument
pub(crate) fn lexical_arg<'a>(operator: &str, term: &'a Term) -> Result<Cow<'a, str>> {
    term.str_value()
        .ok_or_else(|| ExprError::type_mismatch(operator, [term.category()]))
}
