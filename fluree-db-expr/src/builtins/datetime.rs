//! Date and time accessors
//!
//! Components are read in the value's own timezone. YEAR, MONTH and DAY
//! accept dateTime and date; HOURS, MINUTES and SECONDS accept dateTime and
//! time. SECONDS is a decimal including the fractional part.

use crate::category::Category;
use crate::error::{ExprError, Result};
use crate::operator::{computation, OperatorRegistry, OverloadOperator};
use crate::term::{Literal, LiteralValue, Term};
use bigdecimal::BigDecimal;
use chrono::{Datelike, Timelike};
use num_bigint::BigInt;

#[derive(Debug, Clone, Copy)]
enum Component {
    Year,
    Month,
    Day,
    Hours,
    Minutes,
    Seconds,
}

impl Component {
    fn name(self) -> &'static str {
        match self {
            Component::Year => "year",
            Component::Month => "month",
            Component::Day => "day",
            Component::Hours => "hours",
            Component::Minutes => "minutes",
            Component::Seconds => "seconds",
        }
    }

    fn sources(self) -> &'static [Category] {
        match self {
            Component::Year | Component::Month | Component::Day => {
                &[Category::DateTime, Category::Date]
            }
            Component::Hours | Component::Minutes | Component::Seconds => {
                &[Category::DateTime, Category::Time]
            }
        }
    }
}

fn seconds(whole: u32, nanos: u32) -> Term {
    let scaled = BigInt::from(whole) * 1_000_000_000u32 + nanos;
    Literal::decimal(BigDecimal::new(scaled, 9).normalized()).into()
}

fn extract(component: Component, term: &Term) -> Result<Term> {
    let value = term.as_literal().map(Literal::value);
    let n: i64 = match (component, value) {
        (Component::Year, Some(LiteralValue::DateTime(dt))) => dt.year().into(),
        (Component::Year, Some(LiteralValue::Date(d))) => d.date().year().into(),
        (Component::Month, Some(LiteralValue::DateTime(dt))) => dt.month().into(),
        (Component::Month, Some(LiteralValue::Date(d))) => d.date().month().into(),
        (Component::Day, Some(LiteralValue::DateTime(dt))) => dt.day().into(),
        (Component::Day, Some(LiteralValue::Date(d))) => d.date().day().into(),
        (Component::Hours, Some(LiteralValue::DateTime(dt))) => dt.hours().into(),
        (Component::Hours, Some(LiteralValue::Time(t))) => t.time().hour().into(),
        (Component::Minutes, Some(LiteralValue::DateTime(dt))) => dt.minutes().into(),
        (Component::Minutes, Some(LiteralValue::Time(t))) => t.time().minute().into(),
        (Component::Seconds, Some(LiteralValue::DateTime(dt))) => {
            let (whole, nanos) = dt.second_parts();
            return Ok(seconds(whole, nanos));
        }
        (Component::Seconds, Some(LiteralValue::Time(t))) => {
            let time = t.time();
            return Ok(seconds(time.second(), time.nanosecond()));
        }
        _ => {
            return Err(ExprError::type_mismatch(
                component.name(),
                [term.category()],
            ))
        }
    };
    Ok(Term::integer(n))
}

pub(super) fn register(registry: &mut OperatorRegistry) -> Result<()> {
    for component in [
        Component::Year,
        Component::Month,
        Component::Day,
        Component::Hours,
        Component::Minutes,
        Component::Seconds,
    ] {
        registry.register(
            OverloadOperator::builder(component.name(), 1)
                .on_each(
                    &[component.sources()],
                    computation(move |args| extract(component, &args[0])),
                )
                .build()?,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::xsd;

    fn call(name: &str, arg: Term) -> Result<Term> {
        let mut registry = OperatorRegistry::new();
        register(&mut registry)?;
        registry.resolve(name)?.apply_evaluated(&[arg])
    }

    #[test]
    fn test_date_time_components_use_local_time() {
        let dt = Term::typed("2011-01-10T14:45:13.815-05:00", xsd::DATE_TIME);
        assert_eq!(call("year", dt.clone()).unwrap(), Term::integer(2011));
        assert_eq!(call("month", dt.clone()).unwrap(), Term::integer(1));
        assert_eq!(call("day", dt.clone()).unwrap(), Term::integer(10));
        assert_eq!(call("hours", dt.clone()).unwrap(), Term::integer(14));
        assert_eq!(call("minutes", dt.clone()).unwrap(), Term::integer(45));
        assert_eq!(call("seconds", dt).unwrap().str_value().unwrap(), "13.815");
    }

    #[test]
    fn test_date_and_time_sources() {
        let date = Term::typed("2020-02-29", xsd::DATE);
        assert_eq!(call("day", date.clone()).unwrap(), Term::integer(29));
        assert!(matches!(
            call("hours", date),
            Err(ExprError::TypeMismatch { .. })
        ));
        let time = Term::typed("23:59:05", xsd::TIME);
        assert_eq!(call("hours", time.clone()).unwrap(), Term::integer(23));
        assert_eq!(call("seconds", time).unwrap().str_value().unwrap(), "5.0");
    }

    #[test]
    fn test_rejects_strings() {
        assert!(call("year", Term::string("2020-01-01")).is_err());
    }
}
