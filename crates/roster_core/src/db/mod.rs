//! SQLite storage bootstrap, safe query execution and unit-of-work control.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the roster core.
//! - Apply schema migrations in deterministic order.
//! - Run parameterized statements and atomic units of work.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before migrations succeed.
//! - SQL text is assembled only from `'static` fragments; values are bound.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod executor;
pub mod migrations;
mod open;
mod store;
mod transaction;

pub use executor::{SqlText, WriteOutcome};
pub use open::{open_db, open_db_in_memory, open_db_with, StoreOptions};
pub use store::Store;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A unit of work tried to start another unit of work on the same thread.
    NestedTransaction,
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::NestedTransaction => {
                write!(f, "unit of work cannot start a nested transaction")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::NestedTransaction => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
