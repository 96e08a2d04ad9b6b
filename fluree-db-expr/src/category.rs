//! Dispatch categories
//!
//! A [`Category`] is the coarse semantic type of a term. It is the only key
//! used by operator dispatch: two literals whose datatypes map to the same
//! category are interchangeable as far as overload resolution is concerned.
//!
//! Literal categories come from the datatype IRI via [`categorize`]. Non-literal
//! terms (named nodes, blank nodes, variables) carry their own category, so IRIs
//! take part in overload resolution as first-class argument types.

use crate::vocab::{rdf, xsd};
use std::fmt;

/// Dispatch category of a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// xsd:integer and every derived integer type
    Integer,
    /// xsd:decimal
    Decimal,
    /// xsd:float
    Float,
    /// xsd:double
    Double,
    /// xsd:boolean
    Boolean,
    /// Simple string: xsd:string and string-derived types
    String,
    /// Language-tagged string (rdf:langString)
    LangString,
    /// xsd:date
    Date,
    /// xsd:time
    Time,
    /// xsd:dateTime and xsd:dateTimeStamp
    DateTime,
    /// xsd:duration, xsd:dayTimeDuration, xsd:yearMonthDuration
    Duration,
    /// Literal with a datatype this crate does not interpret
    Other,
    /// Literal whose lexical form is invalid for its datatype
    Untyped,
    /// IRI
    NamedNode,
    /// Blank node
    BlankNode,
    /// Unresolved variable placeholder
    Variable,
}

impl Category {
    /// Numeric categories in promotion order
    pub const NUMERIC: &'static [Category] = &[
        Category::Integer,
        Category::Decimal,
        Category::Float,
        Category::Double,
    ];

    /// Simple and language-tagged strings
    pub const STRINGS: &'static [Category] = &[Category::String, Category::LangString];

    /// Categories whose terms have an effective boolean value
    pub const EBV: &'static [Category] = &[
        Category::Integer,
        Category::Decimal,
        Category::Float,
        Category::Double,
        Category::Boolean,
        Category::String,
        Category::LangString,
    ];

    /// Every literal category, including `Other` and `Untyped`
    pub const LITERALS: &'static [Category] = &[
        Category::Integer,
        Category::Decimal,
        Category::Float,
        Category::Double,
        Category::Boolean,
        Category::String,
        Category::LangString,
        Category::Date,
        Category::Time,
        Category::DateTime,
        Category::Duration,
        Category::Other,
        Category::Untyped,
    ];

    /// Every category an evaluated argument can have (all but `Variable`)
    pub const TERMS: &'static [Category] = &[
        Category::Integer,
        Category::Decimal,
        Category::Float,
        Category::Double,
        Category::Boolean,
        Category::String,
        Category::LangString,
        Category::Date,
        Category::Time,
        Category::DateTime,
        Category::Duration,
        Category::Other,
        Category::Untyped,
        Category::NamedNode,
        Category::BlankNode,
    ];

    /// Stable lowercase name used in error messages and logs
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Integer => "integer",
            Category::Decimal => "decimal",
            Category::Float => "float",
            Category::Double => "double",
            Category::Boolean => "boolean",
            Category::String => "string",
            Category::LangString => "langString",
            Category::Date => "date",
            Category::Time => "time",
            Category::DateTime => "dateTime",
            Category::Duration => "duration",
            Category::Other => "other",
            Category::Untyped => "untyped",
            Category::NamedNode => "namedNode",
            Category::BlankNode => "blankNode",
            Category::Variable => "variable",
        }
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        Self::NUMERIC.contains(&self)
    }

    #[inline]
    pub fn is_literal(self) -> bool {
        Self::LITERALS.contains(&self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a datatype IRI to its dispatch category.
///
/// Total: unrecognized datatypes map to [`Category::Other`].
pub fn categorize(datatype_iri: &str) -> Category {
    match datatype_iri {
        xsd::DECIMAL => Category::Decimal,
        xsd::FLOAT => Category::Float,
        xsd::DOUBLE => Category::Double,
        xsd::BOOLEAN => Category::Boolean,
        rdf::LANG_STRING => Category::LangString,
        xsd::DATE_TIME | xsd::DATE_TIME_STAMP => Category::DateTime,
        xsd::DATE => Category::Date,
        xsd::TIME => Category::Time,
        dt if xsd::is_integer_family(dt) => Category::Integer,
        dt if xsd::is_string_family(dt) => Category::String,
        dt if xsd::is_duration_family(dt) => Category::Duration,
        _ => Category::Other,
    }
}

/// Render a category tuple as `(a, b, ...)` for diagnostics
pub fn format_signature(categories: &[Category]) -> String {
    let names: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
    format!("({})", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_subtypes_share_category() {
        assert_eq!(categorize(xsd::INTEGER), Category::Integer);
        assert_eq!(categorize(xsd::UNSIGNED_SHORT), Category::Integer);
        assert_eq!(categorize(xsd::NEGATIVE_INTEGER), Category::Integer);
    }

    #[test]
    fn test_strings() {
        assert_eq!(categorize(xsd::STRING), Category::String);
        assert_eq!(categorize(xsd::TOKEN), Category::String);
        assert_eq!(categorize(rdf::LANG_STRING), Category::LangString);
    }

    #[test]
    fn test_temporal() {
        assert_eq!(categorize(xsd::DATE_TIME), Category::DateTime);
        assert_eq!(categorize(xsd::DATE), Category::Date);
        assert_eq!(categorize(xsd::TIME), Category::Time);
        assert_eq!(categorize(xsd::DAY_TIME_DURATION), Category::Duration);
    }

    #[test]
    fn test_unknown_datatype_is_other() {
        assert_eq!(categorize("http://example.org/dt"), Category::Other);
        assert_eq!(categorize(""), Category::Other);
        assert_eq!(categorize("http://example.org/dt"), categorize("http://example.org/dt"));
    }

    #[test]
    fn test_format_signature() {
        assert_eq!(
            format_signature(&[Category::Integer, Category::LangString]),
            "(integer, langString)"
        );
        assert_eq!(format_signature(&[]), "()");
    }

    #[test]
    fn test_sets() {
        assert!(Category::Float.is_numeric());
        assert!(!Category::Boolean.is_numeric());
        assert!(Category::Untyped.is_literal());
        assert!(!Category::NamedNode.is_literal());
        assert!(!Category::TERMS.contains(&Category::Variable));
    }
}
