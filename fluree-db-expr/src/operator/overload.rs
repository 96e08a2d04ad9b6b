//! Overload-table operators
//!
//! The table maps a concrete tuple of argument categories to a computation.
//! Keys are compared structurally. There is no nearest-match fallback: a
//! tuple that is not in the table is a type mismatch.

use super::{check_arity, Arity, Computation};
use crate::category::{format_signature, Category};
use crate::error::{ExprError, Result};
use crate::term::Term;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Operator whose computation depends on the combination of argument categories
pub struct OverloadOperator {
    name: Arc<str>,
    arity: usize,
    table: FxHashMap<Box<[Category]>, Computation>,
}

impl OverloadOperator {
    pub fn builder(name: impl Into<Arc<str>>, arity: usize) -> OverloadBuilder {
        OverloadBuilder {
            name: name.into(),
            arity,
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        Arity::Exact(self.arity)
    }

    /// Whether a category tuple is supported
    pub fn supports(&self, categories: &[Category]) -> bool {
        self.table.contains_key(categories)
    }

    /// Every registered signature
    pub fn signatures(&self) -> impl Iterator<Item = &[Category]> {
        self.table.keys().map(|k| k.as_ref())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn apply(&self, args: &[Term]) -> Result<Term> {
        check_arity(&self.name, self.arity(), args.len())?;
        let key: Vec<Category> = args.iter().map(Term::category).collect();
        match self.table.get(key.as_slice()) {
            Some(computation) => computation(args),
            None => {
                tracing::trace!(operator = %self.name, found = ?key, "no overload matched");
                Err(ExprError::TypeMismatch {
                    operator: self.name.clone(),
                    found: key,
                })
            }
        }
    }
}

impl fmt::Debug for OverloadOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverloadOperator")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("signatures", &self.table.len())
            .finish()
    }
}

/// Collects signatures for an [`OverloadOperator`]
pub struct OverloadBuilder {
    name: Arc<str>,
    arity: usize,
    entries: Vec<(Vec<Category>, Computation)>,
}

impl OverloadBuilder {
    /// Register one concrete signature
    pub fn on(mut self, signature: &[Category], computation: Computation) -> Self {
        self.entries.push((signature.to_vec(), computation));
        self
    }

    /// Register every combination of the given per-position category sets.
    ///
    /// `on_each(&[Category::NUMERIC, Category::NUMERIC], f)` registers all
    /// sixteen numeric pairs with the same computation.
    pub fn on_each(mut self, positions: &[&[Category]], computation: Computation) -> Self {
        let mut keys: Vec<Vec<Category>> = vec![Vec::new()];
        for choices in positions {
            keys = keys
                .into_iter()
                .flat_map(|prefix| {
                    choices.iter().map(move |c| {
                        let mut key = prefix.clone();
                        key.push(*c);
                        key
                    })
                })
                .collect();
        }
        for key in keys {
            self.entries.push((key, computation.clone()));
        }
        self
    }

    /// Build the table.
    ///
    /// Fails with [`ExprError::Arity`] if a signature length differs from the
    /// declared arity, and with [`ExprError::InvalidExpression`] on duplicates.
    pub fn build(self) -> Result<OverloadOperator> {
        let mut table: FxHashMap<Box<[Category]>, Computation> = FxHashMap::default();
        for (key, computation) in self.entries {
            check_arity(&self.name, Arity::Exact(self.arity), key.len())?;
            if table.contains_key(key.as_slice()) {
                return Err(ExprError::InvalidExpression(format!(
                    "duplicate signature {} for {}",
                    format_signature(&key),
                    self.name
                )));
            }
            table.insert(key.into_boxed_slice(), computation);
        }
        Ok(OverloadOperator {
            name: self.name,
            arity: self.arity,
            table,
        })
    }
}
