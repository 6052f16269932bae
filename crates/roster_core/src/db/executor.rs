//! Parameterized read/write primitives.
//!
//! # Responsibility
//! - Execute SQL against one connection with values passed as bound
//!   parameters only.
//!
//! # Invariants
//! - [`SqlText`] can only be built from `'static` fragments, so caller data
//!   can never become part of statement text.
//! - No retries: store errors are returned as-is.

use super::DbResult;
use rusqlite::{Connection, OptionalExtension, Params, Row};
use std::borrow::Cow;

/// Statement text composed exclusively from string literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlText(Cow<'static, str>);

impl SqlText {
    /// Wraps one literal statement.
    pub const fn from_static(sql: &'static str) -> Self {
        Self(Cow::Borrowed(sql))
    }

    /// Concatenates literal fragments in order.
    pub fn from_fragments<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        Self(Cow::Owned(fragments.into_iter().collect()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for SqlText {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

/// Result of a single write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// `last_insert_rowid()` after the statement; only meaningful for inserts.
    pub last_insert_id: i64,
    pub rows_affected: usize,
}

/// Runs a read statement and maps every returned row.
pub fn query_all<T, P, F>(
    conn: &Connection,
    sql: impl Into<SqlText>,
    params: P,
    map: F,
) -> DbResult<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let sql = sql.into();
    let mut stmt = conn.prepare_cached(sql.as_str())?;
    let rows = stmt.query_map(params, map)?;
    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

/// Runs a read statement expected to return zero or one row.
pub fn query_optional<T, P, F>(
    conn: &Connection,
    sql: impl Into<SqlText>,
    params: P,
    map: F,
) -> DbResult<Option<T>>
where
    P: Params,
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
    let sql = sql.into();
    let mut stmt = conn.prepare_cached(sql.as_str())?;
    let value = stmt.query_row(params, map).optional()?;
    Ok(value)
}

/// Runs one INSERT/UPDATE/DELETE statement.
pub fn execute<P>(conn: &Connection, sql: impl Into<SqlText>, params: P) -> DbResult<WriteOutcome>
where
    P: Params,
{
    let sql = sql.into();
    let mut stmt = conn.prepare_cached(sql.as_str())?;
    let rows_affected = stmt.execute(params)?;
    Ok(WriteOutcome {
        last_insert_id: conn.last_insert_rowid(),
        rows_affected,
    })
}

#[cfg(test)]
mod tests {
    use super::{execute, query_all, query_optional, SqlText};
    use rusqlite::types::Value;
    use rusqlite::{params, params_from_iter, Connection};

    fn scratch() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, label TEXT NOT NULL);")
            .unwrap();
        conn
    }

    #[test]
    fn fragments_concatenate_in_order() {
        let sql = SqlText::from_fragments(["SELECT 1", " WHERE ", "1 = ?"]);
        assert_eq!(sql.as_str(), "SELECT 1 WHERE 1 = ?");
    }

    #[test]
    fn insert_reports_generated_id_and_row_count() {
        let conn = scratch();
        let first = execute(&conn, "INSERT INTO t (label) VALUES (?1);", ["a"]).unwrap();
        let second = execute(&conn, "INSERT INTO t (label) VALUES (?1);", ["b"]).unwrap();
        assert_eq!(first.rows_affected, 1);
        assert_eq!(second.last_insert_id, first.last_insert_id + 1);
    }

    #[test]
    fn hostile_text_is_stored_verbatim() {
        let conn = scratch();
        let hostile = "x'); DROP TABLE t; --";
        execute(&conn, "INSERT INTO t (label) VALUES (?1);", [hostile]).unwrap();

        let labels = query_all(&conn, "SELECT label FROM t;", [], |row| {
            row.get::<_, String>(0)
        })
        .unwrap();
        assert_eq!(labels, vec![hostile.to_string()]);
    }

    #[test]
    fn optional_read_distinguishes_missing_rows() {
        let conn = scratch();
        execute(&conn, "INSERT INTO t (id, label) VALUES (?1, ?2);", params![7, "seven"]).unwrap();

        let found = query_optional(&conn, "SELECT label FROM t WHERE id = ?1;", [7], |row| {
            row.get::<_, String>(0)
        })
        .unwrap();
        let missing = query_optional(&conn, "SELECT label FROM t WHERE id = ?1;", [8], |row| {
            row.get::<_, String>(0)
        })
        .unwrap();
        assert_eq!(found.as_deref(), Some("seven"));
        assert!(missing.is_none());
    }

    #[test]
    fn dynamic_bindings_follow_fragment_order() {
        let conn = scratch();
        for label in ["a", "b", "c"] {
            execute(&conn, "INSERT INTO t (label) VALUES (?1);", [label]).unwrap();
        }
        let sql = SqlText::from_fragments(["SELECT label FROM t WHERE ", "id >= ?", " AND ", "id <= ?"]);
        let values = vec![Value::Integer(2), Value::Integer(3)];
        let labels = query_all(&conn, sql, params_from_iter(values), |row| {
            row.get::<_, String>(0)
        })
        .unwrap();
        assert_eq!(labels, vec!["b".to_string(), "c".to_string()]);
    }
}
