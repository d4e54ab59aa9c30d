//! Defines the core data models and database queries for transactions.

use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, Money,
    database_id::{AccountId, CategoryId, RecurrenceRuleId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money came into or went out of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction type \"{other}\"").into(),
            )),
        }
    }
}

/// Whether a transaction belongs to the user's personal or business finances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionScope {
    #[default]
    Personal,
    Business,
}

impl TransactionScope {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            TransactionScope::Personal => "personal",
            TransactionScope::Business => "business",
        }
    }
}

impl ToSql for TransactionScope {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionScope {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "personal" => Ok(TransactionScope::Personal),
            "business" => Ok(TransactionScope::Business),
            other => Err(FromSqlError::Other(
                format!("unknown transaction scope \"{other}\"").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// How much money moved. Always positive, the direction is given by `transaction_type`.
    pub amount: Money,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    pub date: Date,
    pub is_paid: bool,
    pub category_id: CategoryId,
    pub bank_account_id: AccountId,
    pub scope: TransactionScope,
    pub notes: Option<String>,
    /// The recurrence rule that generated this transaction, if any.
    pub recurrence_rule_id: Option<RecurrenceRuleId>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        bank_account_id: AccountId,
        category_id: CategoryId,
        transaction_type: TransactionType,
        amount: Money,
        date: Date,
        description: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            description: description.to_owned(),
            amount,
            transaction_type,
            date,
            is_paid: false,
            category_id,
            bank_account_id,
            scope: TransactionScope::Personal,
            notes: None,
            recurrence_rule_id: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// This is also the request body for creating a transaction through the API,
/// where `isPaid`, `scope` and `notes` may be omitted.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBuilder {
    /// A human-readable description of the transaction, e.g. "Rent - January".
    pub description: String,

    /// The magnitude of the transaction. Must be greater than zero.
    pub amount: Money,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// The date when the transaction occurred (or is due, for unpaid transactions).
    pub date: Date,

    /// Whether the money has actually moved.
    #[serde(default)]
    pub is_paid: bool,

    pub category_id: CategoryId,

    pub bank_account_id: AccountId,

    #[serde(default)]
    pub scope: TransactionScope,

    #[serde(default)]
    pub notes: Option<String>,

    /// Only set for transactions generated from a recurrence rule.
    #[serde(skip)]
    pub recurrence_rule_id: Option<RecurrenceRuleId>,
}

impl TransactionBuilder {
    /// Set whether the transaction has been paid.
    pub fn paid(mut self, is_paid: bool) -> Self {
        self.is_paid = is_paid;
        self
    }

    pub fn scope(mut self, scope: TransactionScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Set the recurrence rule that generated the transaction.
    pub fn recurrence_rule_id(mut self, recurrence_rule_id: Option<RecurrenceRuleId>) -> Self {
        self.recurrence_rule_id = recurrence_rule_id;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// Creating a transaction only records it, account balances are left untouched.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is zero or negative,
/// - or [Error::EmptyDescription] if the description is blank,
/// - or [Error::InvalidAccount] if the bank account does not exist,
/// - or [Error::InvalidCategory] if the category does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if !builder.amount.is_positive() {
        return Err(Error::NonPositiveAmount);
    }

    let description = builder.description.trim();
    if description.is_empty() {
        return Err(Error::EmptyDescription);
    }

    if !row_exists("account", builder.bank_account_id, connection)? {
        return Err(Error::InvalidAccount(builder.bank_account_id));
    }

    if !row_exists("category", builder.category_id, connection)? {
        return Err(Error::InvalidCategory(builder.category_id));
    }

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\"
                (description, amount, type, date, is_paid, category_id, bank_account_id, scope, notes, recurrence_rule_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             RETURNING id, description, amount, type, date, is_paid, category_id, bank_account_id, scope, notes, recurrence_rule_id",
        )?
        .query_row(
            params![
                description,
                builder.amount,
                builder.transaction_type,
                builder.date,
                builder.is_paid,
                builder.category_id,
                builder.bank_account_id,
                builder.scope,
                builder.notes,
                builder.recurrence_rule_id,
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

pub(crate) fn row_exists(table: &str, id: i64, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
            [id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
#[cfg(test)]
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, description, amount, type, date, is_paid, category_id, bank_account_id, scope, notes, recurrence_rule_id
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount INTEGER NOT NULL CHECK (amount > 0),
                type TEXT NOT NULL,
                date TEXT NOT NULL,
                is_paid INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                bank_account_id INTEGER NOT NULL,
                scope TEXT NOT NULL,
                notes TEXT,
                recurrence_rule_id INTEGER,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT,
                FOREIGN KEY(bank_account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(recurrence_rule_id) REFERENCES recurrence_rule(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Indexes for the filters on the transaction listing.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account ON \"transaction\"(bank_account_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        transaction_type: row.get(3)?,
        date: row.get(4)?,
        is_paid: row.get(5)?,
        category_id: row.get(6)?,
        bank_account_id: row.get(7)?,
        scope: row.get(8)?,
        notes: row.get(9)?,
        recurrence_rule_id: row.get(10)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
