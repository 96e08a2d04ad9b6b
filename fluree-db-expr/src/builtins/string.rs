//! String functions

use super::lexical_arg;
use crate::category::Category;
use crate::error::{ExprError, Result};
use crate::operator::{computation, OperatorRegistry, OverloadOperator};
use crate::term::Term;

/// Result string carrying the language tag of `source`, if any
fn like(source: &Term, value: String) -> Term {
    match source.as_literal().and_then(|lit| lit.language()) {
        Some(lang) => Term::lang_string(value, lang),
        None => Term::string(value),
    }
}

fn language(term: &Term) -> Option<&str> {
    term.as_literal().and_then(|lit| lit.language())
}

/// Argument pairs accepted by the substring tests: both simple, both with
/// the same language tag, or a tagged first argument with a simple second.
const PAIRS: &[[Category; 2]] = &[
    [Category::String, Category::String],
    [Category::LangString, Category::String],
    [Category::LangString, Category::LangString],
];

fn substring_test(name: &'static str, test: fn(&str, &str) -> bool) -> Result<OverloadOperator> {
    let f = computation(move |args| {
        if let (Some(l), Some(r)) = (language(&args[0]), language(&args[1])) {
            if !l.eq_ignore_ascii_case(r) {
                return Err(ExprError::invalid_argument(
                    name,
                    format!("incompatible language tags {} and {}", l, r),
                ));
            }
        }
        let haystack = lexical_arg(name, &args[0])?;
        let needle = lexical_arg(name, &args[1])?;
        Ok(Term::boolean(test(&haystack, &needle)))
    });
    PAIRS
        .iter()
        .fold(OverloadOperator::builder(name, 2), |builder, pair| {
            builder.on(pair, f.clone())
        })
        .build()
}

fn case_mapping(name: &'static str, map: fn(&str) -> String) -> Result<OverloadOperator> {
    OverloadOperator::builder(name, 1)
        .on_each(
            &[Category::STRINGS],
            computation(move |args| {
                let s = lexical_arg(name, &args[0])?;
                Ok(like(&args[0], map(&s)))
            }),
        )
        .build()
}

pub(super) fn register(registry: &mut OperatorRegistry) -> Result<()> {
    registry.register(
        OverloadOperator::builder("strlen", 1)
            .on_each(
                &[Category::STRINGS],
                computation(|args| {
                    let s = lexical_arg("strlen", &args[0])?;
                    Ok(Term::integer(s.chars().count() as i64))
                }),
            )
            .build()?,
    );
    registry.register(case_mapping("ucase", str::to_uppercase)?);
    registry.register(case_mapping("lcase", str::to_lowercase)?);
    registry.register(substring_test("contains", |h, n| h.contains(n))?);
    registry.register(substring_test("strstarts", |h, n| h.starts_with(n))?);
    registry.register(substring_test("strends", |h, n| h.ends_with(n))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Term]) -> Result<Term> {
        let mut registry = OperatorRegistry::new();
        register(&mut registry)?;
        registry.resolve(name)?.apply_evaluated(args)
    }

    #[test]
    fn test_strlen_counts_characters() {
        assert_eq!(call("strlen", &[Term::string("naïve")]).unwrap(), Term::integer(5));
        assert_eq!(
            call("strlen", &[Term::lang_string("chat", "fr")]).unwrap(),
            Term::integer(4)
        );
        assert!(matches!(
            call("strlen", &[Term::integer(5)]),
            Err(ExprError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_case_mapping_keeps_language() {
        assert_eq!(
            call("ucase", &[Term::lang_string("chat", "fr")]).unwrap(),
            Term::lang_string("CHAT", "fr")
        );
        assert_eq!(call("lcase", &[Term::string("ABC")]).unwrap(), Term::string("abc"));
    }

    #[test]
    fn test_substring_tests() {
        assert_eq!(
            call("contains", &[Term::string("foobar"), Term::string("oba")]).unwrap(),
            Term::boolean(true)
        );
        assert_eq!(
            call("strstarts", &[Term::lang_string("foobar", "en"), Term::string("foo")]).unwrap(),
            Term::boolean(true)
        );
        assert_eq!(
            call("strends", &[Term::lang_string("foobar", "en"), Term::lang_string("bar", "EN")])
                .unwrap(),
            Term::boolean(true)
        );
        assert!(matches!(
            call("contains", &[Term::lang_string("a", "en"), Term::lang_string("a", "fr")]),
            Err(ExprError::InvalidArgument { .. })
        ));
        // a simple haystack cannot take a tagged needle
        assert!(matches!(
            call("contains", &[Term::string("a"), Term::lang_string("a", "en")]),
            Err(ExprError::TypeMismatch { .. })
        ));
    }
}
