//! Database initialization and shared connection helpers.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error,
    account::create_account_table,
    category::{create_category_table, seed_system_categories},
    recurrence::create_recurrence_rule_table,
    savings::{create_savings_deposit_table, create_savings_goal_table},
    transaction::create_transaction_table,
};

/// Create the application tables and seed the system categories.
///
/// Safe to call on an existing database, tables that already exist are left untouched.
///
/// # Errors
/// Returns [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must be set first.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_account_table(&transaction)?;
    create_category_table(&transaction)?;
    seed_system_categories(&transaction)?;
    create_recurrence_rule_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_savings_goal_table(&transaction)?;
    create_savings_deposit_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the mutex was poisoned by a panicking thread.
pub fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}
