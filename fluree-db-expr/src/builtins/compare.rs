//! Value comparison
//!
//! `<`, `<=`, `>`, `>=` are defined for numerics (after promotion), simple
//! strings, language strings with equal tags, booleans, dateTime, date and
//! time. `=` and `!=` additionally accept durations, IRIs, blank nodes and
//! literals of uninterpreted or non-lexical datatypes, which compare by term
//! identity. Any comparison involving NaN is false, except `!=`.

use super::numeric::compare_numeric;
use crate::category::Category;
use crate::error::{ExprError, Result};
use crate::operator::{computation, OperatorRegistry, OverloadBuilder, OverloadOperator};
use crate::term::{LiteralValue, Term};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Relation {
    const ALL: [Relation; 6] = [
        Relation::Eq,
        Relation::Ne,
        Relation::Lt,
        Relation::Le,
        Relation::Gt,
        Relation::Ge,
    ];

    fn symbol(self) -> &'static str {
        match self {
            Relation::Eq => "=",
            Relation::Ne => "!=",
            Relation::Lt => "<",
            Relation::Le => "<=",
            Relation::Gt => ">",
            Relation::Ge => ">=",
        }
    }

    fn holds(self, ord: Ordering) -> bool {
        match self {
            Relation::Eq => ord == Ordering::Equal,
            Relation::Ne => ord != Ordering::Equal,
            Relation::Lt => ord == Ordering::Less,
            Relation::Le => ord != Ordering::Greater,
            Relation::Gt => ord == Ordering::Greater,
            Relation::Ge => ord != Ordering::Less,
        }
    }

    fn is_equality(self) -> bool {
        matches!(self, Relation::Eq | Relation::Ne)
    }
}

const NODES: &[Category] = &[Category::NamedNode, Category::BlankNode];

/// Ordering of two literal values, if they are comparable
pub(crate) fn value_cmp(left: &Term, right: &Term) -> Option<Ordering> {
    let (a, b) = (left.as_literal()?, right.as_literal()?);
    match (a.value(), b.value()) {
        (LiteralValue::Numeric(x), LiteralValue::Numeric(y)) => compare_numeric(x, y),
        (LiteralValue::Boolean(x), LiteralValue::Boolean(y)) => Some(x.cmp(y)),
        (LiteralValue::DateTime(x), LiteralValue::DateTime(y)) => Some(x.cmp(y)),
        (LiteralValue::Date(x), LiteralValue::Date(y)) => Some(x.cmp(y)),
        (LiteralValue::Time(x), LiteralValue::Time(y)) => Some(x.cmp(y)),
        (LiteralValue::String(x), LiteralValue::String(y)) => match (a.language(), b.language()) {
            (None, None) => Some(x.cmp(y)),
            (Some(l), Some(r)) if l.eq_ignore_ascii_case(r) => Some(x.cmp(y)),
            _ => None,
        },
        _ => None,
    }
}

/// Equality as used by `=`, IN and NOT IN.
///
/// `None` means the terms are literals that cannot be compared, which the
/// query language treats as an error rather than `false`.
pub(crate) fn equal_terms(left: &Term, right: &Term) -> Option<bool> {
    if let Some(ord) = value_cmp(left, right) {
        return Some(ord == Ordering::Equal);
    }
    if let (Some(a), Some(b)) = (left.as_literal(), right.as_literal()) {
        match (a.value(), b.value()) {
            // NaN, or strings with different language tags
            (LiteralValue::Numeric(_), LiteralValue::Numeric(_))
            | (LiteralValue::String(_), LiteralValue::String(_)) => return Some(false),
            (LiteralValue::Duration(x), LiteralValue::Duration(y)) => {
                return Some(x.months() == y.months() && x.seconds() == y.seconds());
            }
            _ => {}
        }
    }
    if left.to_external_term() == right.to_external_term() {
        Some(true)
    } else if left.is_literal() && right.is_literal() {
        None
    } else {
        Some(false)
    }
}

/// Total order over terms, used by MIN and MAX.
///
/// Blank nodes sort before IRIs, IRIs before literals. Comparable literals
/// use value order; anything else falls back to category, then wire form.
pub(crate) fn term_order(left: &Term, right: &Term) -> Ordering {
    fn rank(term: &Term) -> u8 {
        match term {
            Term::BlankNode(_) => 0,
            Term::NamedNode(_) => 1,
            Term::Literal(_) | Term::NonLexical(_) => 2,
            Term::Variable(_) => 3,
        }
    }
    rank(left).cmp(&rank(right)).then_with(|| {
        value_cmp(left, right).unwrap_or_else(|| {
            left.category()
                .cmp(&right.category())
                .then_with(|| left.to_string().cmp(&right.to_string()))
        })
    })
}

fn compare(relation: Relation, args: &[Term]) -> Result<Term> {
    let (left, right) = (&args[0], &args[1]);
    if relation.is_equality() {
        return match equal_terms(left, right) {
            Some(eq) => Ok(Term::boolean(eq == (relation == Relation::Eq))),
            None => Err(ExprError::type_mismatch(
                relation.symbol(),
                [left.category(), right.category()],
            )),
        };
    }
    match value_cmp(left, right) {
        Some(ord) => Ok(Term::boolean(relation.holds(ord))),
        None if left.category().is_numeric() && right.category().is_numeric() => {
            Ok(Term::boolean(false))
        }
        None => Err(ExprError::type_mismatch(
            relation.symbol(),
            [left.category(), right.category()],
        )),
    }
}

fn comparison(relation: Relation) -> Result<OverloadOperator> {
    let f = computation(move |args| compare(relation, args));
    let mut builder: OverloadBuilder = OverloadOperator::builder(relation.symbol(), 2)
        .on_each(&[Category::NUMERIC, Category::NUMERIC], f.clone());
    for category in [
        Category::String,
        Category::LangString,
        Category::Boolean,
        Category::DateTime,
        Category::Date,
        Category::Time,
    ] {
        builder = builder.on(&[category, category], f.clone());
    }
    if relation.is_equality() {
        for category in [Category::Duration, Category::Other, Category::Untyped] {
            builder = builder.on(&[category, category], f.clone());
        }
        builder = builder
            .on_each(&[NODES, NODES], f.clone())
            .on_each(&[NODES, Category::LITERALS], f.clone())
            .on_each(&[Category::LITERALS, NODES], f);
    }
    builder.build()
}

pub(super) fn register(registry: &mut OperatorRegistry) -> Result<()> {
    for relation in Relation::ALL {
        registry.register(comparison(relation)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Literal;
    use crate::vocab::xsd;

    fn call(name: &str, args: &[Term]) -> Result<Term> {
        let mut registry = OperatorRegistry::new();
        register(&mut registry)?;
        registry.resolve(name)?.apply_evaluated(args)
    }

    #[test]
    fn test_numeric_comparison_across_types() {
        assert_eq!(
            call("=", &[Term::integer(1), Term::double(1.0)]).unwrap(),
            Term::boolean(true)
        );
        assert_eq!(
            call("<", &[Term::typed("2", xsd::SHORT), Term::typed("10", xsd::DECIMAL)]).unwrap(),
            Term::boolean(true)
        );
    }

    #[test]
    fn test_nan_is_unordered() {
        let nan = Term::double(f64::NAN);
        assert_eq!(call("=", &[nan.clone(), nan.clone()]).unwrap(), Term::boolean(false));
        assert_eq!(call("!=", &[nan.clone(), nan.clone()]).unwrap(), Term::boolean(true));
        assert_eq!(call("<", &[nan, Term::integer(1)]).unwrap(), Term::boolean(false));
    }

    #[test]
    fn test_string_comparison() {
        assert_eq!(
            call("<", &[Term::string("apple"), Term::string("banana")]).unwrap(),
            Term::boolean(true)
        );
        assert_eq!(
            call("=", &[Term::lang_string("chat", "FR"), Term::lang_string("chat", "fr")]).unwrap(),
            Term::boolean(true)
        );
        assert_eq!(
            call("=", &[Term::lang_string("a", "en"), Term::lang_string("a", "de")]).unwrap(),
            Term::boolean(false)
        );
        assert!(matches!(
            call("<", &[Term::lang_string("a", "en"), Term::lang_string("b", "de")]),
            Err(ExprError::TypeMismatch { .. })
        ));
        // simple string vs language string is not in the table
        assert!(call("=", &[Term::string("a"), Term::lang_string("a", "en")]).is_err());
    }

    #[test]
    fn test_node_equality() {
        let a = Term::named_node("http://ex.org/a");
        let b = Term::named_node("http://ex.org/b");
        assert_eq!(call("=", &[a.clone(), a.clone()]).unwrap(), Term::boolean(true));
        assert_eq!(call("!=", &[a.clone(), b]).unwrap(), Term::boolean(true));
        assert_eq!(
            call("=", &[a.clone(), Term::string("http://ex.org/a")]).unwrap(),
            Term::boolean(false)
        );
        assert!(matches!(
            call("<", &[a.clone(), a]),
            Err(ExprError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_untyped_equality_by_identity() {
        let x = Term::typed("abc", xsd::INTEGER);
        let y = Term::typed("abd", xsd::INTEGER);
        assert_eq!(call("=", &[x.clone(), x.clone()]).unwrap(), Term::boolean(true));
        assert!(matches!(call("=", &[x.clone(), y]), Err(ExprError::TypeMismatch { .. })));
        assert!(matches!(
            call("=", &[x, Term::integer(1)]),
            Err(ExprError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_temporal_comparison() {
        let early = Term::typed("2024-01-01T00:00:00Z", xsd::DATE_TIME);
        let late = Term::typed("2024-01-01T01:00:00+00:30", xsd::DATE_TIME);
        assert_eq!(call("<", &[early, late]).unwrap(), Term::boolean(true));
        let d1 = Term::typed("P1D", xsd::DURATION);
        let d2 = Term::typed("PT24H", xsd::DAY_TIME_DURATION);
        assert_eq!(call("=", &[d1.clone(), d2]).unwrap(), Term::boolean(true));
        assert!(call("<", &[d1.clone(), d1]).is_err());
    }

    #[test]
    fn test_equal_terms() {
        assert_eq!(equal_terms(&Term::integer(2), &Term::double(2.0)), Some(true));
        assert_eq!(
            equal_terms(&Term::named_node("http://ex.org/a"), &Term::integer(1)),
            Some(false)
        );
        assert_eq!(equal_terms(&Term::integer(1), &Term::string("1")), None);
        assert_eq!(
            equal_terms(&Term::boolean(true), &Term::from(Literal::boolean(true))),
            Some(true)
        );
    }

    #[test]
    fn test_term_order() {
        let mut terms = vec![
            Term::integer(3),
            Term::named_node("http://ex.org/a"),
            Term::double(1.5),
            Term::blank_node("b0"),
        ];
        terms.sort_by(term_order);
        assert_eq!(
            terms,
            vec![
                Term::blank_node("b0"),
                Term::named_node("http://ex.org/a"),
                Term::double(1.5),
                Term::integer(3),
            ]
        );
    }
}
