//! # Parameterized SQL
//!
//! Values never reach query text: they travel as binds and the dialect
//! decides how placeholders are spelled.

mod builder;
mod dialect;
mod value;

pub use builder::{Clause, CompiledQuery, SqlBuilder};
pub use dialect::{ConcatStyle, Dialect, HashFunction, PlaceholderStyle};
pub use value::SqlValue;
