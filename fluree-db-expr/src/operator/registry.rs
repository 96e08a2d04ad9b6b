//! Operator registry
//!
//! Maps operator names (case-insensitive keywords such as `+`, `strlen`, `&&`)
//! and function IRIs (exact match) to resolved [`Operator`]s. The registry is
//! consulted while building expressions, never during evaluation.

use super::Operator;
use crate::error::{ExprError, Result};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::sync::Arc;

static BUILTINS: Lazy<OperatorRegistry> = Lazy::new(OperatorRegistry::with_builtins);

#[derive(Debug, Clone, Default)]
pub struct OperatorRegistry {
    operators: FxHashMap<Arc<str>, Operator>,
    functions: FxHashMap<Arc<str>, Operator>,
}

fn normalize(name: &str) -> Arc<str> {
    Arc::from(name.to_ascii_lowercase())
}

impl OperatorRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with the built-in operators and XSD cast functions
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::builtins::register(&mut registry);
        registry
    }

    /// Shared built-in registry, built on first use
    pub fn builtins() -> &'static OperatorRegistry {
        &BUILTINS
    }

    /// Register an operator under its own name, replacing any previous entry
    pub fn register(&mut self, op: impl Into<Operator>) -> &mut Self {
        let op = op.into();
        let name = normalize(op.name());
        tracing::debug!(operator = %name, class = ?op.class(), "registering operator");
        self.operators.insert(name, op);
        self
    }

    /// Register an operator under an additional name
    pub fn alias(&mut self, alias: &str, target: &str) -> Result<&mut Self> {
        let op = self.resolve(target)?;
        self.operators.insert(normalize(alias), op);
        Ok(self)
    }

    /// Register a function callable by IRI (`NamedCall`)
    pub fn register_function(
        &mut self,
        iri: impl Into<Arc<str>>,
        op: impl Into<Operator>,
    ) -> &mut Self {
        let iri = iri.into();
        let op = op.into();
        tracing::debug!(function = %iri, class = ?op.class(), "registering function");
        self.functions.insert(iri, op);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Operator> {
        self.operators.get(name.to_ascii_lowercase().as_str())
    }

    /// Resolve an operator name or fail with [`ExprError::Unimplemented`]
    pub fn resolve(&self, name: &str) -> Result<Operator> {
        self.get(name)
            .cloned()
            .ok_or_else(|| ExprError::Unimplemented(Arc::from(name)))
    }

    pub fn function(&self, iri: &str) -> Option<&Operator> {
        self.functions.get(iri)
    }

    pub fn operator_names(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(|k| k.as_ref())
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(|k| k.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::operator::{computation, FixedOperator, OperatorClass};
    use crate::term::Term;

    fn answer() -> FixedOperator {
        FixedOperator::new("Answer", Vec::<Category>::new(), computation(|_| Ok(Term::integer(42))))
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let mut registry = OperatorRegistry::new();
        registry.register(answer());
        assert!(registry.get("answer").is_some());
        assert!(registry.get("ANSWER").is_some());
        assert_eq!(registry.resolve("Answer").unwrap().class(), OperatorClass::Fixed);
    }

    #[test]
    fn test_unknown_operator_is_unimplemented() {
        let registry = OperatorRegistry::new();
        assert!(matches!(
            registry.resolve("nope"),
            Err(ExprError::Unimplemented(_))
        ));
    }

    #[test]
    fn test_alias_and_functions() {
        let mut registry = OperatorRegistry::new();
        registry.register(answer());
        registry.alias("forty-two", "answer").unwrap();
        assert!(registry.get("FORTY-TWO").is_some());
        assert!(registry.alias("x", "missing").is_err());

        registry.register_function("http://ex.org/fn#answer", answer());
        assert!(registry.function("http://ex.org/fn#answer").is_some());
        assert!(registry.function("http://ex.org/fn#ANSWER").is_none());
    }

    #[test]
    fn test_shared_builtins() {
        let registry = OperatorRegistry::builtins();
        assert!(std::ptr::eq(registry, OperatorRegistry::builtins()));
        assert!(registry.get("strlen").is_some());
        assert!(registry.function(crate::vocab::xsd::INTEGER).is_some());
    }
}
