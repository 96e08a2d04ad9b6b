//! Literal terms

use super::temporal::{Date, DateTime, Duration, Time};
use crate::category::{categorize, Category};
use crate::error::{ExprError, Result};
use crate::vocab::{rdf, xsd};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Zero;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Numeric value of a literal
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    Integer(BigInt),
    Decimal(BigDecimal),
    Float(f32),
    Double(f64),
}

impl Numeric {
    /// Datatype IRI used when a computation produces this value
    pub fn datatype(&self) -> &'static str {
        match self {
            Numeric::Integer(_) => xsd::INTEGER,
            Numeric::Decimal(_) => xsd::DECIMAL,
            Numeric::Float(_) => xsd::FLOAT,
            Numeric::Double(_) => xsd::DOUBLE,
        }
    }

    /// `value != 0`; NaN is false
    pub fn is_truthy(&self) -> bool {
        match self {
            Numeric::Integer(n) => !n.is_zero(),
            Numeric::Decimal(d) => !d.is_zero(),
            // NaN != 0.0 is true under IEEE, but EBV of NaN is false
            Numeric::Float(f) => !f.is_nan() && *f != 0.0,
            Numeric::Double(d) => !d.is_nan() && *d != 0.0,
        }
    }
}

fn format_ieee<T: fmt::Display + Into<f64> + Copy>(v: T) -> String {
    let d: f64 = v.into();
    if d.is_nan() {
        "NaN".to_string()
    } else if d.is_infinite() {
        (if d > 0.0 { "INF" } else { "-INF" }).to_string()
    } else {
        v.to_string()
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Integer(n) => write!(f, "{}", n),
            Numeric::Decimal(d) => {
                let s = d.normalized().to_string();
                if s.contains('.') || s.contains('e') || s.contains('E') {
                    f.write_str(&s)
                } else {
                    write!(f, "{}.0", s)
                }
            }
            Numeric::Float(v) => f.write_str(&format_ieee(*v)),
            Numeric::Double(v) => f.write_str(&format_ieee(*v)),
        }
    }
}

/// Typed value of a literal
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Numeric(Numeric),
    Boolean(bool),
    DateTime(DateTime),
    Date(Date),
    Time(Time),
    Duration(Duration),
    /// Simple or language-tagged string
    String(Arc<str>),
    /// Value of a datatype without a dedicated representation (the lexical form)
    Other(Arc<str>),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Numeric(n) => write!(f, "{}", n),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::DateTime(dt) => write!(f, "{}", dt),
            LiteralValue::Date(d) => write!(f, "{}", d),
            LiteralValue::Time(t) => write!(f, "{}", t),
            LiteralValue::Duration(d) => write!(f, "{}", d),
            LiteralValue::String(s) | LiteralValue::Other(s) => f.write_str(s),
        }
    }
}

/// A literal with a typed value
///
/// The category is computed from the datatype once, at construction. The
/// constructor never checks the value against the datatype.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    value: LiteralValue,
    lexical: Option<Arc<str>>,
    datatype: Arc<str>,
    language: Option<Arc<str>>,
    category: Category,
}

impl Literal {
    pub fn new(
        value: LiteralValue,
        lexical: Option<Arc<str>>,
        datatype: impl Into<Arc<str>>,
        language: Option<Arc<str>>,
    ) -> Self {
        let datatype = datatype.into();
        let category = categorize(&datatype);
        Self {
            value,
            lexical,
            datatype,
            language,
            category,
        }
    }

    /// Literal produced by a computation (no original lexical form)
    pub fn numeric(n: Numeric) -> Self {
        let dt = n.datatype();
        Self::new(LiteralValue::Numeric(n), None, dt, None)
    }

    pub fn integer(n: impl Into<BigInt>) -> Self {
        Self::numeric(Numeric::Integer(n.into()))
    }

    pub fn decimal(d: BigDecimal) -> Self {
        Self::numeric(Numeric::Decimal(d))
    }

    pub fn float(v: f32) -> Self {
        Self::numeric(Numeric::Float(v))
    }

    pub fn double(v: f64) -> Self {
        Self::numeric(Numeric::Double(v))
    }

    pub fn boolean(b: bool) -> Self {
        Self::new(LiteralValue::Boolean(b), None, xsd::BOOLEAN, None)
    }

    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Self::new(LiteralValue::String(s.into()), None, xsd::STRING, None)
    }

    pub fn lang_string(s: impl Into<Arc<str>>, language: impl Into<Arc<str>>) -> Self {
        Self::new(
            LiteralValue::String(s.into()),
            None,
            rdf::LANG_STRING,
            Some(language.into()),
        )
    }

    pub fn date_time(dt: DateTime) -> Self {
        Self::new(LiteralValue::DateTime(dt), None, xsd::DATE_TIME, None)
    }

    pub fn value(&self) -> &LiteralValue {
        &self.value
    }

    pub fn into_value(self) -> LiteralValue {
        self.value
    }

    /// Original lexical form, if the literal was parsed from one
    pub fn lexical(&self) -> Option<&str> {
        self.lexical.as_deref()
    }

    /// Lexical form for output: the original string, else the canonical form of the value
    pub fn lexical_form(&self) -> Cow<'_, str> {
        match (&self.lexical, &self.value) {
            (Some(lex), _) => Cow::Borrowed(lex),
            (None, LiteralValue::String(s) | LiteralValue::Other(s)) => Cow::Borrowed(s),
            (None, value) => Cow::Owned(value.to_string()),
        }
    }

    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Numeric value, if the literal holds one
    pub fn as_numeric(&self) -> Option<&Numeric> {
        match &self.value {
            LiteralValue::Numeric(n) => Some(n),
            _ => None,
        }
    }

    /// Effective boolean value
    pub fn effective_boolean_value(&self) -> Result<bool> {
        match self.category {
            Category::Integer | Category::Decimal | Category::Float | Category::Double => {
                self.as_numeric()
                    .map(Numeric::is_truthy)
                    .ok_or(ExprError::NotCoercible(self.category))
            }
            Category::Boolean => match self.value {
                LiteralValue::Boolean(b) => Ok(b),
                _ => Err(ExprError::NotCoercible(self.category)),
            },
            Category::String | Category::LangString => Ok(!self.lexical_form().is_empty()),
            other => Err(ExprError::NotCoercible(other)),
        }
    }
}

/// A literal whose lexical form is invalid for its declared datatype
///
/// Always categorized [`Category::Untyped`] and never exposes a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonLexicalLiteral {
    lexical: Arc<str>,
    datatype: Arc<str>,
    language: Option<Arc<str>>,
}

impl NonLexicalLiteral {
    pub fn new(
        lexical: impl Into<Arc<str>>,
        datatype: impl Into<Arc<str>>,
        language: Option<Arc<str>>,
    ) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language,
        }
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn category(&self) -> Category {
        Category::Untyped
    }
}
