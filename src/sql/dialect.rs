//! SQL dialect differences that matter to the compiler
//!
//! Only two things vary: how positional placeholders are spelled, and
//! whether (and how) a stable 64-bit hash of `seed || text` can be computed
//! inside the query.

use std::fmt;

/// Positional placeholder spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `$1`, `$2`, ... (PostgreSQL family)
    Dollar,
    /// `?1`, `?2`, ... (SQLite)
    Question,
}

impl PlaceholderStyle {
    /// Render the placeholder for a 1-based parameter position
    pub fn render(&self, position: usize) -> String {
        match self {
            PlaceholderStyle::Dollar => format!("${}", position),
            PlaceholderStyle::Question => format!("?{}", position),
        }
    }
}

/// How the seed is joined to `text` before hashing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatStyle {
    /// `CONCAT(seed, text)`
    Function,
    /// `(seed || text)`
    Operator,
}

/// A deterministic 64-bit hash function callable from SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashFunction {
    pub name: &'static str,
    pub concat: ConcatStyle,
}

/// Dialect of the word store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    name: &'static str,
    placeholders: PlaceholderStyle,
    hash: Option<HashFunction>,
}

impl Dialect {
    /// SQLite with the `fnv64` scalar function registered per connection
    pub const fn sqlite() -> Self {
        Self {
            name: "sqlite",
            placeholders: PlaceholderStyle::Question,
            hash: Some(HashFunction {
                name: "fnv64",
                concat: ConcatStyle::Operator,
            }),
        }
    }

    /// CockroachDB, which ships `fnv64` as a builtin
    pub const fn cockroach() -> Self {
        Self {
            name: "cockroach",
            placeholders: PlaceholderStyle::Dollar,
            hash: Some(HashFunction {
                name: "fnv64",
                concat: ConcatStyle::Function,
            }),
        }
    }

    /// Plain PostgreSQL: no stable 64-bit hash builtin, so no sampling
    pub const fn postgres() -> Self {
        Self {
            name: "postgres",
            placeholders: PlaceholderStyle::Dollar,
            hash: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn placeholders(&self) -> PlaceholderStyle {
        self.placeholders
    }

    pub fn hash_function(&self) -> Option<HashFunction> {
        self.hash
    }

    pub fn supports_sampling(&self) -> bool {
        self.hash.is_some()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_rendering() {
        assert_eq!(PlaceholderStyle::Dollar.render(3), "$3");
        assert_eq!(PlaceholderStyle::Question.render(12), "?12");
    }

    #[test]
    fn test_sampling_support() {
        assert!(Dialect::sqlite().supports_sampling());
        assert!(Dialect::cockroach().supports_sampling());
        assert!(!Dialect::postgres().supports_sampling());
    }
}
