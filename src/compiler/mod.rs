//! # Query Compiler
//!
//! Deterministically translates a `PageRequest` into one parameterized
//! statement. Identifiers spliced into the text come only from the closed
//! attribute set; every caller-supplied value is a bind.

mod compiler;
mod errors;

pub use compiler::{like_prefix_pattern, QueryCompiler, COLUMNS, WORDS_TABLE};
pub use errors::{CompileError, CompileResult};
