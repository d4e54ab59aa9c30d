//! Defines the bank account model and its database queries.

use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, Money, database_id::AccountId};

/// What kind of bank account an account is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Investment,
    Cash,
}

impl AccountType {
    fn as_str(self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::Investment => "investment",
            AccountType::Cash => "cash",
        }
    }
}

impl ToSql for AccountType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AccountType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            "investment" => Ok(AccountType::Investment),
            "cash" => Ok(AccountType::Cash),
            other => Err(FromSqlError::Other(
                format!("unknown account type \"{other}\"").into(),
            )),
        }
    }
}

/// A bank account, credit card or cash wallet holding money.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    /// The id for the account.
    pub id: AccountId,
    /// The display name of the account, e.g. "Everyday".
    pub name: String,
    /// The kind of account.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// The colour used to display the account in the dashboard.
    pub color: String,
    /// How much money is in the account right now.
    pub current_balance: Money,
    /// Inactive accounts are kept for history but cannot fund savings transfers.
    pub is_active: bool,
}

/// The data needed to create a [BankAccount].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub color: String,
    #[serde(default)]
    pub current_balance: Money,
}

/// A partial update to a [BankAccount]. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    pub color: Option<String>,
    pub current_balance: Option<Money>,
    pub is_active: Option<bool>,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            color TEXT NOT NULL,
            current_balance INTEGER NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &Row) -> Result<BankAccount, rusqlite::Error> {
    Ok(BankAccount {
        id: row.get(0)?,
        name: row.get(1)?,
        account_type: row.get(2)?,
        color: row.get(3)?,
        current_balance: row.get(4)?,
        is_active: row.get(5)?,
    })
}

/// Create a new, active account.
///
/// # Errors
/// Returns an [Error::EmptyName] if the name is blank, or [Error::SqlError] if
/// there is some other SQL error.
pub fn create_account(account: &NewAccount, connection: &Connection) -> Result<BankAccount, Error> {
    let name = account.name.trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    connection
        .prepare(
            "INSERT INTO account (name, type, color, current_balance, is_active)
             VALUES (?1, ?2, ?3, ?4, 1)
             RETURNING id, name, type, color, current_balance, is_active",
        )?
        .query_row(
            params![
                name,
                account.account_type,
                account.color,
                account.current_balance
            ],
            map_row_to_account,
        )
        .map_err(Error::from)
}

/// Retrieve an account by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to an account.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<BankAccount, Error> {
    connection
        .prepare(
            "SELECT id, name, type, color, current_balance, is_active FROM account WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_row_to_account)
        .map_err(Error::from)
}

/// Retrieve all accounts ordered by ID.
pub fn list_accounts(connection: &Connection) -> Result<Vec<BankAccount>, Error> {
    connection
        .prepare("SELECT id, name, type, color, current_balance, is_active FROM account ORDER BY id")?
        .query_map([], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Apply `patch` to the account `id` and return the updated account.
///
/// Setting `currentBalance` here is a direct balance adjustment and does not
/// create a transaction.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to an account, or
/// [Error::EmptyName] if the patch would blank the name.
pub fn update_account(
    id: AccountId,
    patch: &AccountPatch,
    connection: &Connection,
) -> Result<BankAccount, Error> {
    let mut account = get_account(id, connection)?;

    if let Some(name) = &patch.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        account.name = name.to_owned();
    }
    if let Some(account_type) = patch.account_type {
        account.account_type = account_type;
    }
    if let Some(color) = &patch.color {
        account.color.clone_from(color);
    }
    if let Some(balance) = patch.current_balance {
        account.current_balance = balance;
    }
    if let Some(is_active) = patch.is_active {
        account.is_active = is_active;
    }

    connection.execute(
        "UPDATE account
         SET name = ?1, type = ?2, color = ?3, current_balance = ?4, is_active = ?5
         WHERE id = ?6",
        params![
            account.name,
            account.account_type,
            account.color,
            account.current_balance,
            account.is_active,
            id
        ],
    )?;

    Ok(account)
}

/// Overwrite the balance of account `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to an account.
pub fn update_account_balance(
    id: AccountId,
    balance: Money,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET current_balance = ?1 WHERE id = ?2",
        params![balance, id],
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}
