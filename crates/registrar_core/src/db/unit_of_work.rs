//! Single-operation transaction boundary.
//!
//! # Responsibility
//! - Run one repository write inside its own transaction.
//! - Commit on success, roll back explicitly on failure.
//!
//! # Invariants
//! - Units of work are never nested; each call begins a fresh transaction.
//! - The caller's error is returned unchanged after rollback.

use log::{debug, error, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::fmt::Display;

/// Runs `work` inside an immediate transaction on `conn`.
///
/// `operation` is a stable label used only for diagnostics.
///
/// # Errors
/// - Returns the error produced by `work`, after the transaction was rolled back.
/// - Returns begin/commit failures converted from `rusqlite::Error`.
pub fn run_in_transaction<T, E, F>(
    conn: &Connection,
    operation: &'static str,
    work: F,
) -> Result<T, E>
where
    E: From<rusqlite::Error> + Display,
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    match work(&tx) {
        Ok(value) => {
            if let Err(err) = tx.commit() {
                error!(
                    "event=unit_of_work module=db status=error operation={operation} error_code=commit_failed error={err}"
                );
                return Err(err.into());
            }
            debug!("event=unit_of_work module=db status=ok operation={operation}");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                error!(
                    "event=unit_of_work module=db status=error operation={operation} error_code=rollback_failed error={rollback_err}"
                );
            }
            warn!("event=unit_of_work module=db status=rolled_back operation={operation} error={err}");
            Err(err)
        }
    }
}
