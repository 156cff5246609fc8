//! SQLite-backed word store
//!
//! Every call opens its own connection and drops it before returning, so a
//! failed request never leaves a connection behind. Each connection gets the
//! `fnv64` scalar function and case-sensitive LIKE, which keeps prefix
//! matching consistent with the binary ordering of the cursor predicate.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rusqlite::functions::FunctionFlags;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, ErrorCode, OpenFlags, ToSql};

use crate::compiler::{COLUMNS, WORDS_TABLE};
use crate::model::{Attribute, WordRecord};
use crate::sql::{CompiledQuery, Dialect, SqlValue};

use super::errors::{StoreError, StoreResult};
use super::hash::fnv64;
use super::{Row, WordStore};

/// VM instructions between deadline checks
const PROGRESS_INTERVAL: i32 = 1000;

/// A word store in a single SQLite database file
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the `words` relation if it does not exist
    pub fn initialize(&self) -> StoreResult<()> {
        let conn = self.open(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)?;
        conn.execute_batch(&schema_sql()).map_err(execution_error)
    }

    /// Insert or replace words in one transaction; returns rows written
    pub fn insert_words(&self, words: &[WordRecord]) -> StoreResult<usize> {
        for word in words {
            word.check().map_err(|reason| {
                StoreError::Rejected(format!("{:?}: {}", word.text, reason))
            })?;
        }

        let mut conn = self.open(OpenFlags::SQLITE_OPEN_READ_WRITE)?;
        let tx = conn.transaction().map_err(execution_error)?;
        {
            let mut stmt = tx.prepare(&upsert_sql()).map_err(execution_error)?;
            for word in words {
                let mut values = Vec::with_capacity(COLUMNS.len());
                values.push(SqlValue::from(word.text.as_str()));
                values.extend(Attribute::ALL.iter().map(|a| SqlValue::from(word.score(*a))));
                stmt.execute(params_from_iter(values.iter()))
                    .map_err(execution_error)?;
            }
        }
        tx.commit().map_err(execution_error)?;

        Ok(words.len())
    }

    /// Number of stored words
    pub fn count_words(&self) -> StoreResult<u64> {
        let conn = self.open(OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", WORDS_TABLE), [], |row| {
                row.get(0)
            })
            .map_err(execution_error)?;
        Ok(count as u64)
    }

    fn open(&self, flags: OpenFlags) -> StoreResult<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            flags | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| StoreError::Connection(format!("{}: {}", self.path.display(), e)))?;

        conn.create_scalar_function(
            "fnv64",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let key = ctx.get::<String>(0)?;
                Ok(fnv64(key.as_bytes()) as i64)
            },
        )
        .map_err(|e| StoreError::Connection(format!("failed to register fnv64: {}", e)))?;

        conn.pragma_update(None, "case_sensitive_like", true)
            .map_err(|e| StoreError::Connection(format!("failed to configure LIKE: {}", e)))?;

        Ok(conn)
    }
}

impl WordStore for SqliteStore {
    fn dialect(&self) -> Dialect {
        Dialect::sqlite()
    }

    fn fetch_rows(
        &self,
        query: &CompiledQuery,
        deadline: Option<Instant>,
    ) -> StoreResult<Vec<Row>> {
        let conn = self.open(OpenFlags::SQLITE_OPEN_READ_ONLY)?;

        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return Err(StoreError::Timeout);
            }
            conn.progress_handler(PROGRESS_INTERVAL, Some(move || Instant::now() >= deadline));
        }

        let mut stmt = conn.prepare(query.sql()).map_err(execution_error)?;
        let column_count = stmt.column_count();
        let mut rows = stmt
            .query(params_from_iter(query.params().iter()))
            .map_err(execution_error)?;

        let mut result = Vec::new();
        while let Some(row) = rows.next().map_err(execution_error)? {
            let mut values = Vec::with_capacity(column_count);
            for column in 0..column_count {
                let value = row.get_ref(column).map_err(execution_error)?;
                values.push(to_sql_value(result.len(), column, value)?);
            }
            result.push(Row::new(values));
        }

        Ok(result)
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Integer(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            SqlValue::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
        })
    }
}

fn to_sql_value(row: usize, column: usize, value: ValueRef<'_>) -> StoreResult<SqlValue> {
    match value {
        ValueRef::Null => Ok(SqlValue::Null),
        ValueRef::Integer(v) => Ok(SqlValue::Integer(v)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| SqlValue::Text(s.to_string()))
            .map_err(|e| StoreError::Decode {
                row,
                column,
                message: format!("invalid UTF-8: {}", e),
            }),
        ValueRef::Real(v) => Err(StoreError::Decode {
            row,
            column,
            message: format!("unexpected real value {}", v),
        }),
        ValueRef::Blob(_) => Err(StoreError::Decode {
            row,
            column,
            message: "unexpected blob value".to_string(),
        }),
    }
}

fn execution_error(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.code == ErrorCode::OperationInterrupted {
            return StoreError::Timeout;
        }
    }
    StoreError::Execution(err.to_string())
}

fn schema_sql() -> String {
    let mut columns = vec!["text TEXT PRIMARY KEY NOT NULL CHECK (length(text) > 0)".to_string()];
    for attr in Attribute::ALL {
        let domain = attr.domain();
        columns.push(format!(
            "{col} INTEGER NOT NULL DEFAULT 0 CHECK ({col} BETWEEN {min} AND {max})",
            col = attr.column(),
            min = domain.min,
            max = domain.max,
        ));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);",
        WORDS_TABLE,
        columns.join(",\n    ")
    )
}

fn upsert_sql() -> String {
    let placeholders: Vec<String> = (1..=COLUMNS.len()).map(|i| format!("?{}", i)).collect();
    let updates: Vec<String> = COLUMNS[1..]
        .iter()
        .map(|col| format!("{col} = excluded.{col}"))
        .collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT(text) DO UPDATE SET {}",
        WORDS_TABLE,
        COLUMNS.join(", "),
        placeholders.join(", "),
        updates.join(", ")
    )
}
