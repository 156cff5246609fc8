//! Page request → parameterized statement
//!
//! Clause order is fixed:
//!
//! 1. cursor predicate `text > :start_from`
//! 2. (sampling) open the inner query
//! 3. one range clause per narrowed attribute, declared order
//! 4. word length minimum, then maximum
//! 5. text prefix
//! 6. (sampling) hash order and sample size, close the inner query
//! 7. presentation order and `limit + 1`
//!
//! The extra row fetched in step 7 is the sentinel used to detect `has_more`.

use crate::model::{PageRequest, Sampling, SortField, SortSpec, WORD_LENGTH_DOMAIN};
use crate::sql::{Clause, CompiledQuery, ConcatStyle, Dialect, SqlBuilder};

use super::errors::{CompileError, CompileResult};

/// Name of the word relation
pub const WORDS_TABLE: &str = "words";

/// Projected columns, in row decode order
pub const COLUMNS: [&str; 9] = [
    "text",
    "commonness",
    "offensiveness",
    "sentiment",
    "formality",
    "culturalsensitivity",
    "figurativeness",
    "complexity",
    "political",
];

/// Alias of the sampled inner query
const SAMPLE_ALIAS: &str = "sample";

/// Compiles page requests for one dialect
#[derive(Debug, Clone, Copy)]
pub struct QueryCompiler {
    dialect: Dialect,
}

impl QueryCompiler {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Compile a request into a single statement plus its parameters
    pub fn compile(&self, request: &PageRequest) -> CompileResult<CompiledQuery> {
        request.validate()?;

        if request.is_sampling() && !self.dialect.supports_sampling() {
            return Err(CompileError::SamplingUnsupported {
                dialect: self.dialect.name().to_string(),
            });
        }

        let projection = COLUMNS.join(", ");
        let mut builder = SqlBuilder::new();

        if request.is_sampling() {
            builder.push(&format!("SELECT {} FROM (", projection));
        }

        builder
            .push(&format!(
                "SELECT {} FROM {} WHERE text > ",
                projection, WORDS_TABLE
            ))
            .push_clause(Clause::new().bind(request.start_from()));

        for (attr, range) in request.ranges().active() {
            let column = attr.column();
            builder.and_where(
                Clause::new()
                    .sql(&format!("{} >= ", column))
                    .bind(range.min())
                    .sql(&format!(" AND {} <= ", column))
                    .bind(range.max()),
            );
        }

        let length = request.word_length();
        if length.has_min(WORD_LENGTH_DOMAIN) {
            builder.and_where(Clause::new().sql("length(text) >= ").bind(length.min()));
        }
        if length.has_max(WORD_LENGTH_DOMAIN) {
            builder.and_where(Clause::new().sql("length(text) <= ").bind(length.max()));
        }

        if let Some(prefix) = request.prefix() {
            builder.and_where(
                Clause::new()
                    .sql("text LIKE ")
                    .bind(like_prefix_pattern(prefix))
                    .sql(" ESCAPE '\\'"),
            );
        }

        if let Some(sampling) = request.sampling() {
            builder.push_clause(self.sample_clause(sampling)?);
        }

        builder.push_clause(order_clause(request.sort()));
        builder.push_clause(
            Clause::new()
                .sql(" LIMIT ")
                .bind(i64::from(request.limit()) + 1),
        );

        Ok(builder.build(&self.dialect))
    }

    /// ` ORDER BY hash(seed, text) LIMIT :count) AS sample`
    fn sample_clause(&self, sampling: &Sampling) -> CompileResult<Clause> {
        let hash = self
            .dialect
            .hash_function()
            .ok_or_else(|| CompileError::SamplingUnsupported {
                dialect: self.dialect.name().to_string(),
            })?;

        let clause = Clause::new().sql(&format!(" ORDER BY {}(", hash.name));
        let clause = match hash.concat {
            ConcatStyle::Function => clause.sql("CONCAT(").bind(sampling.seed()).sql(", text))"),
            ConcatStyle::Operator => clause.sql("(").bind(sampling.seed()).sql(" || text))"),
        };

        Ok(clause
            .sql(", text LIMIT ")
            .bind(sampling.count())
            .sql(&format!(") AS {}", SAMPLE_ALIAS)))
    }
}

/// ` ORDER BY <field> <dir>[, text ASC]`
fn order_clause(sort: SortSpec) -> Clause {
    let mut sql = format!(" ORDER BY {} {}", sort.field.column(), sort.direction.keyword());
    if sort.field != SortField::Text {
        sql.push_str(", text ASC");
    }
    Clause::new().sql(&sql)
}

/// `prefix%` with LIKE metacharacters in the prefix escaped by `\`
pub fn like_prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
