//! File-backed store handle.
//!
//! # Responsibility
//! - Own the database location and connection options.
//! - Expose per-call query entry points that open, execute and release a
//!   connection.
//!
//! # Invariants
//! - A `Store` value exists only after the schema bootstrap has succeeded.
//! - No connection is held between calls.

use super::executor::{self, SqlText, WriteOutcome};
use super::open::{connect, open_db_with, StoreOptions};
use super::DbResult;
use rusqlite::{Connection, Params, Row};
use std::path::{Path, PathBuf};

/// Handle to one roster database file.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    options: StoreOptions,
}

impl Store {
    /// Initializes the schema at `path` (idempotent) and returns a handle.
    ///
    /// Process bootstrap calls this once; request paths only use the
    /// returned handle.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    /// Same as [`Store::open`] with explicit connection options.
    pub fn open_with(path: impl AsRef<Path>, options: StoreOptions) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_db_with(&path, &options)?;
        drop(conn);
        Ok(Self { path, options })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Opens one configured connection to the store.
    pub(crate) fn connect(&self) -> DbResult<Connection> {
        connect(&self.path, &self.options)
    }

    /// Reads zero or more rows on a fresh connection.
    pub fn query_all<T, P, F>(&self, sql: impl Into<SqlText>, params: P, map: F) -> DbResult<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.connect()?;
        executor::query_all(&conn, sql, params, map)
    }

    /// Reads zero or one row on a fresh connection.
    pub fn query_optional<T, P, F>(
        &self,
        sql: impl Into<SqlText>,
        params: P,
        map: F,
    ) -> DbResult<Option<T>>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.connect()?;
        executor::query_optional(&conn, sql, params, map)
    }

    /// Runs one autocommit write statement on a fresh connection.
    pub fn execute<P>(&self, sql: impl Into<SqlText>, params: P) -> DbResult<WriteOutcome>
    where
        P: Params,
    {
        let conn = self.connect()?;
        executor::execute(&conn, sql, params)
    }
}
