//! # Word Store
//!
//! The boundary with the relational engine. The core needs exactly one
//! capability from a store: run a compiled statement and hand back its rows,
//! columns in projection order.

mod errors;
mod hash;
mod sqlite;

use std::time::Instant;

use crate::sql::{CompiledQuery, Dialect, SqlValue};

pub use errors::{StoreError, StoreResult};
pub use hash::fnv64;
pub use sqlite::SqliteStore;

/// One result row, columns in projection order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<SqlValue>,
}

impl Row {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: usize) -> Option<&SqlValue> {
        self.values.get(column)
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }
}

/// A relational store holding the `words` relation
///
/// Implementations acquire whatever resource a call needs and release it
/// before returning, on success and failure alike.
pub trait WordStore: Send + Sync {
    /// Dialect the compiler must target
    fn dialect(&self) -> Dialect;

    /// Execute `query` and return every row it produces.
    ///
    /// If `deadline` is set and passes before the statement completes, the
    /// statement is abandoned with `StoreError::Timeout`.
    fn fetch_rows(
        &self,
        query: &CompiledQuery,
        deadline: Option<Instant>,
    ) -> StoreResult<Vec<Row>>;
}

impl<S: WordStore + ?Sized> WordStore for std::sync::Arc<S> {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn fetch_rows(
        &self,
        query: &CompiledQuery,
        deadline: Option<Instant>,
    ) -> StoreResult<Vec<Row>> {
        (**self).fetch_rows(query, deadline)
    }
}
