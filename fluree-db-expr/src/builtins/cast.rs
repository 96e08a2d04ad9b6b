//! XSD constructor functions
//!
//! `xsd:integer(?x)` and friends are registered as functions, called by IRI.
//! Casting a string parses it under the target datatype; a lexical form that
//! does not parse is an invalid argument, not a non-lexical literal.

use super::numeric::{to_decimal, to_f64};
use super::{lexical_arg, numeric_arg};
use crate::category::Category;
use crate::error::{ExprError, Result};
use crate::operator::{computation, OperatorRegistry, OverloadOperator};
use crate::term::{Literal, LiteralValue, Numeric, Term};
use crate::vocab::xsd;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::FromPrimitive;

/// Numerics, booleans and strings
const SCALAR: &[Category] = &[
    Category::Integer,
    Category::Decimal,
    Category::Float,
    Category::Double,
    Category::Boolean,
    Category::String,
];

const TO_STRING: &[Category] = &[
    Category::Integer,
    Category::Decimal,
    Category::Float,
    Category::Double,
    Category::Boolean,
    Category::String,
    Category::DateTime,
    Category::Date,
    Category::Time,
    Category::Duration,
    Category::NamedNode,
];

fn boolean_of(cast: &str, term: &Term) -> Result<bool> {
    match term.as_literal().map(Literal::value) {
        Some(LiteralValue::Boolean(b)) => Ok(*b),
        _ => Err(ExprError::type_mismatch(cast, [term.category()])),
    }
}

/// Parse a string argument under `datatype`, producing a canonical literal
fn parse_as(term: &Term, datatype: &'static str) -> Result<Term> {
    let lexical = lexical_arg(datatype, term)?;
    match Term::typed(lexical.trim(), datatype) {
        Term::Literal(lit) => Ok(Literal::new(lit.into_value(), None, datatype, None).into()),
        _ => Err(ExprError::invalid_argument(
            datatype,
            format!("cannot cast {:?}", lexical),
        )),
    }
}

fn cannot_cast(datatype: &'static str, n: &Numeric) -> ExprError {
    ExprError::invalid_argument(datatype, format!("cannot cast {}", n))
}

fn to_string(term: &Term) -> Result<Term> {
    Ok(Term::string(lexical_arg(xsd::STRING, term)?.into_owned()))
}

fn to_boolean(term: &Term) -> Result<Term> {
    match term.category() {
        Category::String => parse_as(term, xsd::BOOLEAN),
        Category::Boolean => Ok(Term::boolean(boolean_of(xsd::BOOLEAN, term)?)),
        _ => Ok(Term::boolean(numeric_arg(xsd::BOOLEAN, term)?.is_truthy())),
    }
}

fn to_integer(term: &Term) -> Result<Term> {
    let n = match term.category() {
        Category::String => return parse_as(term, xsd::INTEGER),
        Category::Boolean => BigInt::from(u8::from(boolean_of(xsd::INTEGER, term)?)),
        _ => match numeric_arg(xsd::INTEGER, term)? {
            Numeric::Integer(i) => i.clone(),
            Numeric::Decimal(d) => d.with_scale(0).into_bigint_and_exponent().0,
            n @ (Numeric::Float(_) | Numeric::Double(_)) => to_f64(n)
                .filter(|x| x.is_finite())
                .and_then(|x| BigInt::from_f64(x.trunc()))
                .ok_or_else(|| cannot_cast(xsd::INTEGER, n))?,
        },
    };
    Ok(Literal::integer(n).into())
}

fn to_decimal_term(term: &Term) -> Result<Term> {
    let d = match term.category() {
        Category::String => return parse_as(term, xsd::DECIMAL),
        Category::Boolean => BigDecimal::from(u8::from(boolean_of(xsd::DECIMAL, term)?)),
        _ => {
            let n = numeric_arg(xsd::DECIMAL, term)?;
            to_decimal(n).ok_or_else(|| cannot_cast(xsd::DECIMAL, n))?
        }
    };
    Ok(Literal::decimal(d).into())
}

fn double_of(datatype: &'static str, term: &Term) -> Result<f64> {
    if term.category() == Category::Boolean {
        return Ok(if boolean_of(datatype, term)? { 1.0 } else { 0.0 });
    }
    let n = numeric_arg(datatype, term)?;
    to_f64(n).ok_or_else(|| cannot_cast(datatype, n))
}

fn to_float(term: &Term) -> Result<Term> {
    if term.category() == Category::String {
        return parse_as(term, xsd::FLOAT);
    }
    Ok(Literal::float(double_of(xsd::FLOAT, term)? as f32).into())
}

fn to_double(term: &Term) -> Result<Term> {
    if term.category() == Category::String {
        return parse_as(term, xsd::DOUBLE);
    }
    Ok(Literal::double(double_of(xsd::DOUBLE, term)?).into())
}

fn to_date_time(term: &Term) -> Result<Term> {
    match term.as_literal().map(Literal::value) {
        Some(LiteralValue::DateTime(dt)) => Ok(Literal::date_time(dt.clone()).into()),
        _ => parse_as(term, xsd::DATE_TIME),
    }
}

fn cast(
    datatype: &'static str,
    sources: &[Category],
    f: fn(&Term) -> Result<Term>,
) -> Result<OverloadOperator> {
    OverloadOperator::builder(datatype, 1)
        .on_each(&[sources], computation(move |args| f(&args[0])))
        .build()
}

pub(super) fn register(registry: &mut OperatorRegistry) -> Result<()> {
    registry
        .register_function(xsd::STRING, cast(xsd::STRING, TO_STRING, to_string)?)
        .register_function(xsd::BOOLEAN, cast(xsd::BOOLEAN, SCALAR, to_boolean)?)
        .register_function(xsd::INTEGER, cast(xsd::INTEGER, SCALAR, to_integer)?)
        .register_function(xsd::DECIMAL, cast(xsd::DECIMAL, SCALAR, to_decimal_term)?)
        .register_function(xsd::FLOAT, cast(xsd::FLOAT, SCALAR, to_float)?)
        .register_function(xsd::DOUBLE, cast(xsd::DOUBLE, SCALAR, to_double)?)
        .register_function(
            xsd::DATE_TIME,
            cast(
                xsd::DATE_TIME,
                &[Category::DateTime, Category::String],
                to_date_time,
            )?,
        );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(iri: &str, arg: Term) -> Result<Term> {
        let mut registry = OperatorRegistry::new();
        register(&mut registry)?;
        registry
            .function(iri)
            .ok_or_else(|| ExprError::Unimplemented(iri.into()))?
            .apply_evaluated(&[arg])
    }

    #[test]
    fn test_casts_are_functions_not_operators() {
        let mut registry = OperatorRegistry::new();
        register(&mut registry).unwrap();
        assert!(registry.function(xsd::INTEGER).is_some());
        assert!(registry.get(xsd::INTEGER).is_none());
    }

    #[test]
    fn test_string_to_integer() {
        let t = call(xsd::INTEGER, Term::string(" 007 ")).unwrap();
        assert_eq!(t, Term::integer(7));
        assert_eq!(t.str_value().unwrap(), "7");
        assert!(matches!(
            call(xsd::INTEGER, Term::string("abc")),
            Err(ExprError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_numeric_to_integer_truncates() {
        assert_eq!(call(xsd::INTEGER, Term::double(-3.9)).unwrap(), Term::integer(-3));
        assert_eq!(call(xsd::INTEGER, Term::typed("2.75", xsd::DECIMAL)).unwrap(), Term::integer(2));
        assert_eq!(call(xsd::INTEGER, Term::boolean(true)).unwrap(), Term::integer(1));
        assert!(call(xsd::INTEGER, Term::double(f64::NAN)).is_err());
    }

    #[test]
    fn test_to_boolean_and_string() {
        assert_eq!(call(xsd::BOOLEAN, Term::integer(0)).unwrap(), Term::boolean(false));
        assert_eq!(call(xsd::BOOLEAN, Term::string("1")).unwrap(), Term::boolean(true));
        assert_eq!(call(xsd::STRING, Term::double(1.5)).unwrap(), Term::string("1.5"));
        assert_eq!(
            call(xsd::STRING, Term::named_node("http://ex.org/a")).unwrap(),
            Term::string("http://ex.org/a")
        );
        assert!(matches!(
            call(xsd::STRING, Term::lang_string("chat", "fr")),
            Err(ExprError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_floating_casts() {
        assert_eq!(call(xsd::DOUBLE, Term::string("INF")).unwrap(), Term::double(f64::INFINITY));
        assert_eq!(call(xsd::FLOAT, Term::integer(2)).unwrap(), Term::from(Literal::float(2.0)));
        assert!(call(xsd::DECIMAL, Term::double(f64::INFINITY)).is_err());
        assert_eq!(
            call(xsd::DECIMAL, Term::integer(3)).unwrap().category(),
            Category::Decimal
        );
    }

    #[test]
    fn test_to_date_time() {
        let t = call(xsd::DATE_TIME, Term::string("2024-03-01T12:00:00Z")).unwrap();
        assert_eq!(t.category(), Category::DateTime);
        assert!(call(xsd::DATE_TIME, Term::string("yesterday")).is_err());
        assert!(call(xsd::DATE_TIME, Term::integer(1)).is_err());
    }
}
