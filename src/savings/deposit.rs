//! Defines the savings deposit record, the audit trail of savings transfers.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, Money,
    database_id::{AccountId, DepositId, GoalId, TransactionId},
};

/// One committed transfer into or out of a savings goal.
///
/// Deposits are never updated. Each one is paired with exactly one mirror
/// transaction against the bank account that funded it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsDeposit {
    pub id: DepositId,
    pub savings_goal_id: GoalId,
    pub bank_account_id: AccountId,
    /// The mirror transaction created by the transfer.
    pub transaction_id: TransactionId,
    /// Positive for a deposit into the goal, negative for a withdrawal.
    pub amount: Money,
    pub date: Date,
    pub notes: Option<String>,
}

/// The data needed to record a [SavingsDeposit].
#[derive(Debug, Clone, PartialEq)]
pub struct NewDeposit {
    pub savings_goal_id: GoalId,
    pub bank_account_id: AccountId,
    pub transaction_id: TransactionId,
    pub amount: Money,
    pub date: Date,
    pub notes: Option<String>,
}

pub fn create_savings_deposit_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS savings_deposit (
            id INTEGER PRIMARY KEY,
            savings_goal_id INTEGER NOT NULL,
            bank_account_id INTEGER NOT NULL,
            transaction_id INTEGER NOT NULL UNIQUE,
            amount INTEGER NOT NULL CHECK (amount != 0),
            date TEXT NOT NULL,
            notes TEXT,
            FOREIGN KEY(savings_goal_id) REFERENCES savings_goal(id) ON UPDATE CASCADE ON DELETE RESTRICT,
            FOREIGN KEY(bank_account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE RESTRICT,
            FOREIGN KEY(transaction_id) REFERENCES \"transaction\"(id) ON UPDATE CASCADE ON DELETE RESTRICT
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_savings_deposit_goal ON savings_deposit(savings_goal_id);",
        (),
    )?;

    Ok(())
}

fn map_row_to_deposit(row: &Row) -> Result<SavingsDeposit, rusqlite::Error> {
    Ok(SavingsDeposit {
        id: row.get(0)?,
        savings_goal_id: row.get(1)?,
        bank_account_id: row.get(2)?,
        transaction_id: row.get(3)?,
        amount: row.get(4)?,
        date: row.get(5)?,
        notes: row.get(6)?,
    })
}

/// Append a deposit record.
///
/// # Errors
/// Returns [Error::SqlError] if the record violates a constraint, e.g. the
/// amount is zero or the transaction is already linked to a deposit.
pub fn create_deposit(deposit: &NewDeposit, connection: &Connection) -> Result<SavingsDeposit, Error> {
    connection
        .prepare(
            "INSERT INTO savings_deposit (savings_goal_id, bank_account_id, transaction_id, amount, date, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, savings_goal_id, bank_account_id, transaction_id, amount, date, notes",
        )?
        .query_row(
            params![
                deposit.savings_goal_id,
                deposit.bank_account_id,
                deposit.transaction_id,
                deposit.amount,
                deposit.date,
                deposit.notes,
            ],
            map_row_to_deposit,
        )
        .map_err(Error::from)
}

/// Retrieve the deposit history of a savings goal, newest first.
pub fn list_deposits(goal_id: GoalId, connection: &Connection) -> Result<Vec<SavingsDeposit>, Error> {
    connection
        .prepare(
            "SELECT id, savings_goal_id, bank_account_id, transaction_id, amount, date, notes
             FROM savings_deposit
             WHERE savings_goal_id = :goal_id
             ORDER BY date DESC, id DESC",
        )?
        .query_map(&[(":goal_id", &goal_id)], map_row_to_deposit)?
        .map(|maybe_deposit| maybe_deposit.map_err(Error::from))
        .collect()
}
