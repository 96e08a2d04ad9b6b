//! Runtime terms
//!
//! A [`Term`] is what an expression evaluates to. Every term can be coerced to
//! its effective boolean value and rendered to the external (wire) form.
//!
//! # Module Structure
//!
//! - `literal`: typed literals and non-lexical literals
//! - `parse`: lexical form → term
//! - `temporal`: XSD dateTime, date, time and duration values

mod literal;
mod parse;
pub mod temporal;

pub use literal::{Literal, LiteralValue, NonLexicalLiteral, Numeric};

use crate::category::Category;
use crate::error::{ExprError, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A runtime value produced or consumed by expression evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Literal(Literal),
    /// Literal whose lexical form failed to parse under its datatype
    NonLexical(NonLexicalLiteral),
    NamedNode(Arc<str>),
    BlankNode(Arc<str>),
    /// Unresolved variable placeholder
    Variable(Arc<str>),
}

impl Term {
    pub fn literal(lit: Literal) -> Self {
        Term::Literal(lit)
    }

    pub fn integer(n: i64) -> Self {
        Term::Literal(Literal::integer(n))
    }

    pub fn double(d: f64) -> Self {
        Term::Literal(Literal::double(d))
    }

    pub fn boolean(b: bool) -> Self {
        Term::Literal(Literal::boolean(b))
    }

    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Term::Literal(Literal::string(s))
    }

    pub fn lang_string(s: impl Into<Arc<str>>, language: impl Into<Arc<str>>) -> Self {
        Term::Literal(Literal::lang_string(s, language))
    }

    pub fn named_node(iri: impl Into<Arc<str>>) -> Self {
        Term::NamedNode(iri.into())
    }

    pub fn blank_node(label: impl Into<Arc<str>>) -> Self {
        Term::BlankNode(label.into())
    }

    pub fn variable(name: impl Into<Arc<str>>) -> Self {
        Term::Variable(name.into())
    }

    /// Dispatch category.
    ///
    /// Literals report the category of their datatype, non-lexical literals
    /// `Untyped`, and other terms the category of their variant.
    pub fn category(&self) -> Category {
        match self {
            Term::Literal(lit) => lit.category(),
            Term::NonLexical(nl) => nl.category(),
            Term::NamedNode(_) => Category::NamedNode,
            Term::BlankNode(_) => Category::BlankNode,
            Term::Variable(_) => Category::Variable,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_) | Term::NonLexical(_))
    }

    /// Lexical form of a literal (typed or not); IRI for named nodes
    pub fn str_value(&self) -> Option<std::borrow::Cow<'_, str>> {
        match self {
            Term::Literal(lit) => Some(lit.lexical_form()),
            Term::NonLexical(nl) => Some(std::borrow::Cow::Borrowed(nl.lexical())),
            Term::NamedNode(iri) => Some(std::borrow::Cow::Borrowed(iri)),
            Term::BlankNode(_) | Term::Variable(_) => None,
        }
    }

    /// Effective boolean value (EBV).
    ///
    /// See: <https://www.w3.org/TR/sparql11-query/#ebv>
    pub fn effective_boolean_value(&self) -> Result<bool> {
        match self {
            Term::Literal(lit) => lit.effective_boolean_value(),
            other => Err(ExprError::NotCoercible(other.category())),
        }
    }

    /// Wire form of this term
    pub fn to_external_term(&self) -> ExternalTerm {
        match self {
            Term::Literal(lit) => ExternalTerm::Literal {
                value: lit.lexical_form().into_owned(),
                language: lit.language().map(str::to_string),
                datatype: lit.datatype().to_string(),
            },
            Term::NonLexical(nl) => ExternalTerm::Literal {
                value: nl.lexical().to_string(),
                language: nl.language().map(str::to_string),
                datatype: nl.datatype().to_string(),
            },
            Term::NamedNode(iri) => ExternalTerm::NamedNode {
                value: iri.to_string(),
            },
            Term::BlankNode(label) => ExternalTerm::BlankNode {
                value: label.to_string(),
            },
            Term::Variable(name) => ExternalTerm::Variable {
                value: name.to_string(),
            },
        }
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

/// Term as handed out of the expression engine
///
/// Structural equality on this form is RDF term identity (sameTerm).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "termType")]
pub enum ExternalTerm {
    Literal {
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        datatype: String,
    },
    NamedNode {
        value: String,
    },
    BlankNode {
        value: String,
    },
    Variable {
        value: String,
    },
}

impl fmt::Display for ExternalTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalTerm::Literal {
                value,
                language: Some(lang),
                ..
            } => write!(f, "{:?}@{}", value, lang),
            ExternalTerm::Literal {
                value, datatype, ..
            } => write!(f, "{:?}^^<{}>", value, datatype),
            ExternalTerm::NamedNode { value } => write!(f, "<{}>", value),
            ExternalTerm::BlankNode { value } => write!(f, "_:{}", value),
            ExternalTerm::Variable { value } => write!(f, "?{}", value),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_external_term())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::xsd;

    #[test]
    fn test_non_literal_categories() {
        assert_eq!(Term::named_node("http://ex.org/a").category(), Category::NamedNode);
        assert_eq!(Term::blank_node("b0").category(), Category::BlankNode);
        assert_eq!(Term::variable("x").category(), Category::Variable);
    }

    #[test]
    fn test_non_lexical_round_trips_lexical() {
        let term = Term::typed("abc", xsd::INTEGER);
        assert_eq!(term.category(), Category::Untyped);
        assert!(term.as_literal().is_none());
        assert_eq!(
            term.to_external_term(),
            ExternalTerm::Literal {
                value: "abc".to_string(),
                language: None,
                datatype: xsd::INTEGER.to_string(),
            }
        );
        assert!(matches!(
            term.effective_boolean_value(),
            Err(ExprError::NotCoercible(Category::Untyped))
        ));
    }

    #[test]
    fn test_wire_form_prefers_original_lexical() {
        let term = Term::typed("007", xsd::INTEGER);
        assert_eq!(term.to_string(), format!("\"007\"^^<{}>", xsd::INTEGER));
        assert_eq!(Term::integer(7).to_string(), format!("\"7\"^^<{}>", xsd::INTEGER));
    }

    #[test]
    fn test_wire_form_serialization() {
        let json = serde_json::to_value(Term::lang_string("hi", "en").to_external_term()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "termType": "Literal",
                "value": "hi",
                "language": "en",
                "datatype": crate::vocab::rdf::LANG_STRING,
            })
        );
        let json = serde_json::to_value(Term::named_node("http://ex.org/a").to_external_term())
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"termType": "NamedNode", "value": "http://ex.org/a"})
        );
    }

    #[test]
    fn test_nodes_not_coercible() {
        assert!(matches!(
            Term::named_node("http://ex.org/a").effective_boolean_value(),
            Err(ExprError::NotCoercible(Category::NamedNode))
        ));
    }
}
