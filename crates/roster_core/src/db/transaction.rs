//! Unit-of-work orchestration.
//!
//! # Responsibility
//! - Run a caller-supplied unit of work on one connection, atomically.
//! - Provide a consistent read snapshot for multi-statement reads.
//!
//! # Invariants
//! - Units of work begin with `BEGIN IMMEDIATE`; the write lock is held from
//!   the first statement until commit or rollback.
//! - `Ok` commits, `Err` rolls back everything the unit of work executed.
//! - A unit of work must not start another one on the same thread.

use super::store::Store;
use super::{DbError, DbResult};
use log::{error, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::cell::Cell;
use std::time::Instant;

thread_local! {
    static IN_UNIT_OF_WORK: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as running a unit of work until dropped.
struct UnitOfWorkGuard;

impl UnitOfWorkGuard {
    fn enter() -> DbResult<Self> {
        IN_UNIT_OF_WORK.with(|flag| {
            if flag.get() {
                return Err(DbError::NestedTransaction);
            }
            flag.set(true);
            Ok(Self)
        })
    }
}

impl Drop for UnitOfWorkGuard {
    fn drop(&mut self) {
        IN_UNIT_OF_WORK.with(|flag| flag.set(false));
    }
}

impl Store {
    /// Runs `work` inside one write-lock-first transaction.
    ///
    /// Blocks (up to the configured busy timeout) while another unit of work
    /// holds the write lock. Errors returned by `work`, business-rule errors
    /// included, roll the transaction back and are returned unchanged.
    ///
    /// # Errors
    /// - `DbError::NestedTransaction` when called from inside `work`.
    /// - Store errors from connect, begin or commit.
    pub fn run_in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<DbError>,
    {
        let _guard = UnitOfWorkGuard::enter()?;
        let started_at = Instant::now();

        let mut conn = self.connect()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(DbError::from)?;

        match work(&tx) {
            Ok(value) => {
                tx.commit().map_err(DbError::from)?;
                info!(
                    "event=tx_commit module=db status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    error!(
                        "event=tx_rollback module=db status=error error_code=rollback_failed error={}",
                        rollback_err
                    );
                } else {
                    warn!(
                        "event=tx_rollback module=db status=ok duration_ms={}",
                        started_at.elapsed().as_millis()
                    );
                }
                Err(err)
            }
        }
    }

    /// Runs several reads against one snapshot of the store.
    ///
    /// Uses a deferred transaction: no write lock is taken, and a concurrent
    /// unit of work is observed either fully or not at all.
    pub fn read_snapshot<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        let mut conn = self.connect()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Deferred)
            .map_err(DbError::from)?;
        let value = work(&tx)?;
        tx.commit().map_err(DbError::from)?;
        Ok(value)
    }
}
