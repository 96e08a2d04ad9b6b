//! Fixed-signature operators

use super::{check_arity, Arity, Computation};
use crate::category::Category;
use crate::error::{ExprError, Result};
use crate::term::Term;
use std::fmt;
use std::sync::Arc;

/// Operator with exactly one argument-category signature
pub struct FixedOperator {
    name: Arc<str>,
    signature: Box<[Category]>,
    computation: Computation,
}

impl FixedOperator {
    pub fn new(
        name: impl Into<Arc<str>>,
        signature: impl Into<Box<[Category]>>,
        computation: Computation,
    ) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
            computation,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &[Category] {
        &self.signature
    }

    pub fn arity(&self) -> Arity {
        Arity::Exact(self.signature.len())
    }

    /// Run the computation if every argument's category equals the declared
    /// category at its position. No coercion happens here.
    pub fn apply(&self, args: &[Term]) -> Result<Term> {
        check_arity(&self.name, self.arity(), args.len())?;
        let matches = args
            .iter()
            .zip(self.signature.iter())
            .all(|(arg, expected)| arg.category() == *expected);
        if !matches {
            let found: Vec<Category> = args.iter().map(Term::category).collect();
            tracing::trace!(
                operator = %self.name,
                expected = ?self.signature,
                found = ?found,
                "fixed signature mismatch"
            );
            return Err(ExprError::TypeMismatch {
                operator: self.name.clone(),
                found,
            });
        }
        (self.computation)(args)
    }
}

impl fmt::Debug for FixedOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedOperator")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::computation;

    fn strlen() -> FixedOperator {
        FixedOperator::new(
            "strlen",
            vec![Category::String],
            computation(|args| {
                let len = args[0].str_value().map(|s| s.chars().count()).unwrap_or(0);
                Ok(Term::integer(len as i64))
            }),
        )
    }

    #[test]
    fn test_matching_signature_delegates() {
        let op = strlen();
        assert_eq!(op.apply(&[Term::string("héllo")]).unwrap(), Term::integer(5));
    }

    #[test]
    fn test_category_mismatch() {
        let op = strlen();
        let err = op.apply(&[Term::integer(3)]).unwrap_err();
        assert!(matches!(err, ExprError::TypeMismatch { ref found, .. } if found == &[Category::Integer]));
        // no implicit coercion from language strings either
        assert!(op.apply(&[Term::lang_string("x", "en")]).is_err());
    }

    #[test]
    fn test_wrong_argument_count() {
        let op = strlen();
        assert!(matches!(
            op.apply(&[]).unwrap_err(),
            ExprError::Arity { actual: 0, .. }
        ));
    }
}
