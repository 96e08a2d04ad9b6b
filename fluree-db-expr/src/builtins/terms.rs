//! Functions on RDF terms
//!
//! STR, LANG, DATATYPE, ISIRI/ISURI, ISBLANK, ISLITERAL, ISNUMERIC and
//! sameTerm are overload tables; BNODE, STRLANG, STRDT, LANGMATCHES and IRI
//! have one fixed signature each.

use super::lexical_arg;
use crate::category::Category;
use crate::error::{ExprError, Result};
use crate::operator::{computation, Computation, FixedOperator, OperatorRegistry, OverloadOperator};
use crate::term::Term;
use crate::vocab::rdf;
use uuid::Uuid;

/// Literal categories plus named nodes
const STRINGIFIABLE: &[&[Category]] = &[Category::LITERALS, &[Category::NamedNode]];

fn overload_over(
    name: &'static str,
    groups: &[&[Category]],
    f: Computation,
) -> Result<OverloadOperator> {
    groups
        .iter()
        .fold(OverloadOperator::builder(name, 1), |builder, group| {
            builder.on_each(&[*group], f.clone())
        })
        .build()
}

fn term_test(name: &'static str, test: fn(&Term) -> bool) -> Result<OverloadOperator> {
    overload_over(
        name,
        &[Category::TERMS],
        computation(move |args| Ok(Term::boolean(test(&args[0])))),
    )
}

fn str_of(args: &[Term]) -> Result<Term> {
    Ok(Term::string(lexical_arg("str", &args[0])?.into_owned()))
}

fn lang_of(args: &[Term]) -> Result<Term> {
    let lang = match &args[0] {
        Term::Literal(lit) => lit.language(),
        Term::NonLexical(nl) => nl.language(),
        _ => None,
    };
    Ok(Term::string(lang.unwrap_or("")))
}

fn datatype_of(args: &[Term]) -> Result<Term> {
    match &args[0] {
        Term::Literal(lit) => Ok(Term::named_node(lit.datatype())),
        Term::NonLexical(nl) => Ok(Term::named_node(nl.datatype())),
        other => Err(ExprError::type_mismatch("datatype", [other.category()])),
    }
}

/// RFC 4647 basic filtering
fn lang_matches(tag: &str, range: &str) -> bool {
    if range == "*" {
        return !tag.is_empty();
    }
    match tag.get(..range.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(range) => {
            tag.len() == range.len() || tag.as_bytes()[range.len()] == b'-'
        }
        _ => false,
    }
}

pub(super) fn register(registry: &mut OperatorRegistry) -> Result<()> {
    registry.register(overload_over("str", STRINGIFIABLE, computation(str_of))?);
    registry.register(overload_over("lang", &[Category::LITERALS], computation(lang_of))?);
    registry.register(overload_over(
        "datatype",
        &[Category::LITERALS],
        computation(datatype_of),
    )?);

    registry.register(term_test("isiri", |t| matches!(t, Term::NamedNode(_)))?);
    registry.alias("isuri", "isiri")?;
    registry.register(term_test("isblank", |t| matches!(t, Term::BlankNode(_)))?);
    registry.register(term_test("isliteral", Term::is_literal)?);
    registry.register(term_test("isnumeric", |t| t.category().is_numeric())?);

    registry.register(
        OverloadOperator::builder("sameterm", 2)
            .on_each(
                &[Category::TERMS, Category::TERMS],
                computation(|args| {
                    Ok(Term::boolean(
                        args[0].to_external_term() == args[1].to_external_term(),
                    ))
                }),
            )
            .build()?,
    );

    registry.register(FixedOperator::new(
        "bnode",
        Vec::<Category>::new(),
        computation(|_| Ok(Term::blank_node(format!("b{}", Uuid::new_v4().simple())))),
    ));
    registry.register(FixedOperator::new(
        "strlang",
        vec![Category::String, Category::String],
        computation(|args| {
            let lexical = lexical_arg("strlang", &args[0])?;
            let lang = lexical_arg("strlang", &args[1])?;
            if lang.is_empty() {
                return Err(ExprError::invalid_argument("strlang", "empty language tag"));
            }
            Ok(Term::lang_string(lexical.into_owned(), lang.into_owned()))
        }),
    ));
    registry.register(FixedOperator::new(
        "strdt",
        vec![Category::String, Category::NamedNode],
        computation(|args| {
            let lexical = lexical_arg("strdt", &args[0])?;
            let datatype = lexical_arg("strdt", &args[1])?;
            if datatype == rdf::LANG_STRING {
                return Err(ExprError::invalid_argument(
                    "strdt",
                    "rdf:langString requires a language tag",
                ));
            }
            Ok(Term::typed(lexical.into_owned(), datatype.into_owned()))
        }),
    ));
    registry.register(FixedOperator::new(
        "langmatches",
        vec![Category::String, Category::String],
        computation(|args| {
            let tag = lexical_arg("langmatches", &args[0])?;
            let range = lexical_arg("langmatches", &args[1])?;
            Ok(Term::boolean(lang_matches(&tag, &range)))
        }),
    ));
    registry.register(FixedOperator::new(
        "iri",
        vec![Category::String],
        computation(|args| Ok(Term::named_node(lexical_arg("iri", &args[0])?.into_owned()))),
    ));
    registry.alias("uri", "iri")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::OperatorClass;
    use crate::vocab::xsd;

    fn registry() -> OperatorRegistry {
        let mut registry = OperatorRegistry::new();
        register(&mut registry).unwrap();
        registry
    }

    fn call(name: &str, args: &[Term]) -> Result<Term> {
        registry().resolve(name)?.apply_evaluated(args)
    }

    #[test]
    fn test_str_lang_datatype() {
        assert_eq!(call("str", &[Term::integer(7)]).unwrap(), Term::string("7"));
        assert_eq!(
            call("str", &[Term::named_node("http://ex.org/a")]).unwrap(),
            Term::string("http://ex.org/a")
        );
        // only the lexical form is needed, so non-lexical literals work
        assert_eq!(
            call("str", &[Term::typed("abc", xsd::INTEGER)]).unwrap(),
            Term::string("abc")
        );
        assert!(call("str", &[Term::blank_node("b0")]).is_err());

        assert_eq!(call("lang", &[Term::lang_string("x", "en")]).unwrap(), Term::string("en"));
        assert_eq!(call("lang", &[Term::string("x")]).unwrap(), Term::string(""));
        assert_eq!(
            call("datatype", &[Term::typed("abc", xsd::INTEGER)]).unwrap(),
            Term::named_node(xsd::INTEGER)
        );
    }

    #[test]
    fn test_term_tests() {
        let iri = Term::named_node("http://ex.org/a");
        assert_eq!(call("isIRI", &[iri.clone()]).unwrap(), Term::boolean(true));
        assert_eq!(call("isURI", &[iri.clone()]).unwrap(), Term::boolean(true));
        assert_eq!(call("isLiteral", &[iri]).unwrap(), Term::boolean(false));
        assert_eq!(
            call("isNumeric", &[Term::typed("abc", xsd::INTEGER)]).unwrap(),
            Term::boolean(false)
        );
        assert_eq!(call("isNumeric", &[Term::double(1.0)]).unwrap(), Term::boolean(true));
        assert_eq!(
            call("isBlank", &[Term::blank_node("b0")]).unwrap(),
            Term::boolean(true)
        );
    }

    #[test]
    fn test_same_term_is_identity() {
        assert_eq!(
            call("sameTerm", &[Term::integer(1), Term::typed("01", xsd::INTEGER)]).unwrap(),
            Term::boolean(false)
        );
        assert_eq!(
            call("sameTerm", &[Term::string("a"), Term::string("a")]).unwrap(),
            Term::boolean(true)
        );
    }

    #[test]
    fn test_bnode_is_fixed_and_fresh() {
        let registry = registry();
        let bnode = registry.resolve("bnode").unwrap();
        assert_eq!(bnode.class(), OperatorClass::Fixed);
        let a = bnode.apply_evaluated(&[]).unwrap();
        let b = bnode.apply_evaluated(&[]).unwrap();
        assert_eq!(a.category(), Category::BlankNode);
        assert_ne!(a, b);
    }

    #[test]
    fn test_constructors() {
        assert_eq!(
            call("strlang", &[Term::string("chat"), Term::string("fr")]).unwrap(),
            Term::lang_string("chat", "fr")
        );
        assert!(matches!(
            call("strlang", &[Term::lang_string("chat", "en"), Term::string("fr")]),
            Err(ExprError::TypeMismatch { .. })
        ));
        let dt = call(
            "strdt",
            &[Term::string("12"), Term::named_node(xsd::INTEGER)],
        )
        .unwrap();
        assert_eq!(dt.category(), Category::Integer);
        let bad = call("strdt", &[Term::string("x"), Term::named_node(xsd::INTEGER)]).unwrap();
        assert_eq!(bad.category(), Category::Untyped);
        assert_eq!(
            call("iri", &[Term::string("http://ex.org/a")]).unwrap(),
            Term::named_node("http://ex.org/a")
        );
        assert!(registry().get("uri").is_some());
    }

    #[test]
    fn test_lang_matches() {
        assert!(lang_matches("en-US", "en"));
        assert!(lang_matches("EN", "en"));
        assert!(!lang_matches("eng", "en"));
        assert!(lang_matches("fr", "*"));
        assert!(!lang_matches("", "*"));
        assert_eq!(
            call("langMatches", &[Term::string("de-CH"), Term::string("de")]).unwrap(),
            Term::boolean(true)
        );
    }
}
