//! Variable binding lookup
//!
//! The evaluator only needs a pure `name → term` lookup. [`SolutionMapping`]
//! is a simple owned implementation for callers (and tests) that do not have
//! their own row type.

use crate::term::Term;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Solution-mapping lookup consumed by the evaluator
///
/// Implementations must be side-effect free. `None` means the variable is
/// unbound, which is distinct from being bound to a non-lexical literal.
pub trait Bindings: Send + Sync {
    fn resolve(&self, variable: &str) -> Option<Term>;
}

/// Owned variable → term map
#[derive(Debug, Clone, Default)]
pub struct SolutionMapping {
    values: FxHashMap<Arc<str>, Term>,
}

impl SolutionMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding, replacing any previous value
    pub fn with(mut self, variable: impl Into<Arc<str>>, term: Term) -> Self {
        self.insert(variable, term);
        self
    }

    pub fn insert(&mut self, variable: impl Into<Arc<str>>, term: Term) -> Option<Term> {
        self.values.insert(variable.into(), term)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_ref())
    }
}

impl Bindings for SolutionMapping {
    fn resolve(&self, variable: &str) -> Option<Term> {
        self.values.get(variable).cloned()
    }
}

impl<B: Bindings + ?Sized> Bindings for &B {
    fn resolve(&self, variable: &str) -> Option<Term> {
        (**self).resolve(variable)
    }
}

impl<B: Bindings + ?Sized> Bindings for Arc<B> {
    fn resolve(&self, variable: &str) -> Option<Term> {
        (**self).resolve(variable)
    }
}

impl<T> FromIterator<(T, Term)> for SolutionMapping
where
    T: Into<Arc<str>>,
{
    fn from_iter<I: IntoIterator<Item = (T, Term)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
