//! Parameterized query builder
//!
//! SQL text and bind values are accumulated together as a single stream of
//! parts. Placeholder numbers do not exist until `build`, which walks the
//! stream once and numbers each bind in order. A clause that is never
//! appended therefore cannot reserve or skip a position.

use serde::Serialize;

use super::dialect::Dialect;
use super::value::SqlValue;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Bind(SqlValue),
}

/// A fragment of SQL together with the values it binds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clause {
    parts: Vec<Part>,
}

impl Clause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal SQL text
    pub fn sql(mut self, text: &str) -> Self {
        push_text(&mut self.parts, text);
        self
    }

    /// Append a bind value
    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.parts.push(Part::Bind(value.into()));
        self
    }

    /// Number of bind values in this clause
    pub fn bind_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, Part::Bind(_)))
            .count()
    }
}

/// Accumulates a full statement
#[derive(Debug, Clone, Default)]
pub struct SqlBuilder {
    parts: Vec<Part>,
}

impl SqlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal SQL text
    pub fn push(&mut self, text: &str) -> &mut Self {
        push_text(&mut self.parts, text);
        self
    }

    /// Append a whole clause, text and binds together
    pub fn push_clause(&mut self, clause: Clause) -> &mut Self {
        for part in clause.parts {
            match part {
                Part::Text(text) => push_text(&mut self.parts, &text),
                bind => self.parts.push(bind),
            }
        }
        self
    }

    /// Append ` AND <clause>`
    pub fn and_where(&mut self, clause: Clause) -> &mut Self {
        self.push(" AND ").push_clause(clause)
    }

    /// Number of bind values appended so far
    pub fn bind_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, Part::Bind(_)))
            .count()
    }

    /// Render the statement, numbering placeholders in append order
    pub fn build(self, dialect: &Dialect) -> CompiledQuery {
        let style = dialect.placeholders();
        let mut sql = String::new();
        let mut params = Vec::with_capacity(self.bind_count());

        for part in self.parts {
            match part {
                Part::Text(text) => sql.push_str(&text),
                Part::Bind(value) => {
                    params.push(value);
                    sql.push_str(&style.render(params.len()));
                }
            }
        }

        CompiledQuery { sql, params }
    }
}

fn push_text(parts: &mut Vec<Part>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Part::Text(last)) = parts.last_mut() {
        last.push_str(text);
    } else {
        parts.push(Part::Text(text.to_string()));
    }
}

/// Query text plus its ordered parameter list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl CompiledQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }
}
