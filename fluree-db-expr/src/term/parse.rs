//! Lexical parsing of literals
//!
//! Turns a (lexical, datatype, language) triple into a [`Term`]. Parsing never
//! fails: a lexical form that is invalid for its datatype yields a
//! [`NonLexicalLiteral`] instead of an error.

use super::literal::{Literal, LiteralValue, NonLexicalLiteral, Numeric};
use super::temporal::{Date, DateTime, Duration, Time};
use super::Term;
use crate::category::{categorize, Category};
use crate::vocab::{rdf, xsd};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::str::FromStr;
use std::sync::Arc;

fn strip_sign(s: &str) -> &str {
    s.strip_prefix(['+', '-']).unwrap_or(s)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// XSD integer lexical space (digits with optional sign)
fn parse_integer(s: &str, datatype: &str) -> Option<BigInt> {
    if !all_digits(strip_sign(s)) {
        return None;
    }
    let n = BigInt::from_str(s.strip_prefix('+').unwrap_or(s)).ok()?;
    match xsd::integer_bounds(datatype) {
        Some((min, max)) => {
            let v = i128::try_from(&n).ok()?;
            (min..=max).contains(&v).then_some(n)
        }
        None => Some(n),
    }
}

/// XSD decimal lexical space (no exponent)
fn parse_decimal(s: &str) -> Option<BigDecimal> {
    let unsigned = strip_sign(s);
    let valid = match unsigned.split_once('.') {
        Some((int, frac)) => {
            (int.is_empty() || all_digits(int))
                && (frac.is_empty() || all_digits(frac))
                && !(int.is_empty() && frac.is_empty())
        }
        None => all_digits(unsigned),
    };
    if !valid {
        return None;
    }
    let mut normalized = String::with_capacity(s.len() + 2);
    if s.starts_with('-') {
        normalized.push('-');
    }
    if unsigned.starts_with('.') {
        normalized.push('0');
    }
    normalized.push_str(unsigned);
    if unsigned.ends_with('.') {
        normalized.push('0');
    }
    BigDecimal::from_str(&normalized).ok()
}

/// XSD float/double lexical space
fn parse_double(s: &str) -> Option<f64> {
    match s {
        "INF" | "+INF" => return Some(f64::INFINITY),
        "-INF" => return Some(f64::NEG_INFINITY),
        "NaN" => return Some(f64::NAN),
        _ => {}
    }
    let unsigned = strip_sign(s);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (unsigned, None),
    };
    if parse_decimal(mantissa).is_none() {
        return None;
    }
    if let Some(exp) = exponent {
        if !all_digits(strip_sign(exp)) {
            return None;
        }
    }
    s.parse::<f64>().ok()
}

fn parse_boolean(s: &str) -> Option<bool> {
    match s {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a lexical form into the typed value for a datatype category
pub(crate) fn parse_value(
    lexical: &str,
    datatype: &str,
    category: Category,
) -> Option<LiteralValue> {
    let numeric = |n: Numeric| LiteralValue::Numeric(n);
    match category {
        Category::Integer => parse_integer(lexical, datatype).map(|n| numeric(Numeric::Integer(n))),
        Category::Decimal => parse_decimal(lexical).map(|d| numeric(Numeric::Decimal(d))),
        // out-of-range magnitudes round to ±INF
        Category::Float => parse_double(lexical).map(|d| numeric(Numeric::Float(d as f32))),
        Category::Double => parse_double(lexical).map(|d| numeric(Numeric::Double(d))),
        Category::Boolean => parse_boolean(lexical).map(LiteralValue::Boolean),
        Category::DateTime => DateTime::parse(lexical).ok().map(LiteralValue::DateTime),
        Category::Date => Date::parse(lexical).ok().map(LiteralValue::Date),
        Category::Time => Time::parse(lexical).ok().map(LiteralValue::Time),
        Category::Duration => Duration::parse(lexical).ok().map(LiteralValue::Duration),
        Category::String => Some(LiteralValue::String(Arc::from(lexical))),
        Category::Other => Some(LiteralValue::Other(Arc::from(lexical))),
        // rdf:langString without a language tag has no value
        Category::LangString
        | Category::Untyped
        | Category::NamedNode
        | Category::BlankNode
        | Category::Variable => None,
    }
}

impl Term {
    /// Build a literal term from its lexical form.
    ///
    /// A language tag forces the datatype to rdf:langString. Lexical forms that
    /// do not parse under the datatype produce [`Term::NonLexical`].
    pub fn parse_literal(
        lexical: impl Into<Arc<str>>,
        datatype: impl Into<Arc<str>>,
        language: Option<Arc<str>>,
    ) -> Term {
        let lexical: Arc<str> = lexical.into();
        if let Some(lang) = language {
            return Term::Literal(Literal::new(
                LiteralValue::String(lexical.clone()),
                Some(lexical),
                rdf::LANG_STRING,
                Some(lang),
            ));
        }

        let datatype: Arc<str> = datatype.into();
        match parse_value(&lexical, &datatype, categorize(&datatype)) {
            Some(value) => Term::Literal(Literal::new(value, Some(lexical), datatype, None)),
            None => {
                tracing::trace!(lexical = %lexical, datatype = %datatype, "non-lexical literal");
                Term::NonLexical(NonLexicalLiteral::new(lexical, datatype, None))
            }
        }
    }

    /// Build a typed literal term (no language)
    pub fn typed(lexical: impl Into<Arc<str>>, datatype: impl Into<Arc<str>>) -> Term {
        Term::parse_literal(lexical, datatype, None)
    }
}
