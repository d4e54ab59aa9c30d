//! Defines the category model, its database queries and the system category resolver.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::CategoryId,
    transaction::{TransactionScope, TransactionType},
};

/// The key of the system category used for money moving into a savings goal.
const SAVINGS_DEPOSIT_KEY: &str = "savings_deposit";
/// The key of the system category used for money moving out of a savings goal.
const SAVINGS_WITHDRAWAL_KEY: &str = "savings_withdrawal";

/// A label for grouping transactions, e.g. "Groceries" or "Salary".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Whether the category is for money coming in or going out.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub scope: TransactionScope,
    pub icon: Option<String>,
    pub color: String,
    pub is_active: bool,
    /// System categories are created by the application and tag the
    /// transactions it creates itself, such as savings transfers.
    pub is_system: bool,
}

/// The data needed to create a [Category].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub scope: TransactionScope,
    #[serde(default)]
    pub icon: Option<String>,
    pub color: String,
}

/// Create the category table in the database.
///
/// System categories are identified by a unique `system_key` rather than by
/// their name, so users are free to rename them.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            scope TEXT NOT NULL,
            icon TEXT,
            color TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            system_key TEXT UNIQUE
        )",
        (),
    )?;

    Ok(())
}

/// Insert the system categories if they do not exist yet.
pub fn seed_system_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement = connection.prepare(
        "INSERT OR IGNORE INTO category (name, type, scope, icon, color, is_active, system_key)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
    )?;

    statement.execute(params![
        "Savings deposit",
        TransactionType::Expense,
        TransactionScope::Personal,
        "piggy-bank",
        "#10B981",
        SAVINGS_DEPOSIT_KEY
    ])?;
    statement.execute(params![
        "Savings withdrawal",
        TransactionType::Income,
        TransactionScope::Personal,
        "piggy-bank",
        "#10B981",
        SAVINGS_WITHDRAWAL_KEY
    ])?;

    Ok(())
}

pub fn map_row_to_category(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        transaction_type: row.get(2)?,
        scope: row.get(3)?,
        icon: row.get(4)?,
        color: row.get(5)?,
        is_active: row.get(6)?,
        is_system: row.get(7)?,
    })
}

/// Create a new, active user category.
///
/// # Errors
/// Returns an [Error::EmptyName] if the name is blank.
pub fn create_category(category: &NewCategory, connection: &Connection) -> Result<Category, Error> {
    let name = category.name.trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    connection
        .prepare(
            "INSERT INTO category (name, type, scope, icon, color, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)
             RETURNING id, name, type, scope, icon, color, is_active, system_key IS NOT NULL",
        )?
        .query_row(
            params![
                name,
                category.transaction_type,
                category.scope,
                category.icon,
                category.color
            ],
            map_row_to_category,
        )
        .map_err(Error::from)
}

/// Retrieve a category by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a category.
pub fn get_category(id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, name, type, scope, icon, color, is_active, system_key IS NOT NULL
             FROM category WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_row_to_category)
        .map_err(Error::from)
}

/// Retrieve all categories, system categories included, ordered by ID.
pub fn list_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, type, scope, icon, color, is_active, system_key IS NOT NULL
             FROM category ORDER BY id",
        )?
        .query_map([], map_row_to_category)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Get the ID of the system category used to tag the mirror transaction of a
/// savings transfer of the given `transaction_type`.
///
/// # Errors
/// Returns [Error::NotFound] if the database was not initialized with the
/// system categories.
pub fn get_savings_category(
    transaction_type: TransactionType,
    connection: &Connection,
) -> Result<CategoryId, Error> {
    let system_key = match transaction_type {
        TransactionType::Expense => SAVINGS_DEPOSIT_KEY,
        TransactionType::Income => SAVINGS_WITHDRAWAL_KEY,
    };

    connection
        .query_row(
            "SELECT id FROM category WHERE system_key = ?1",
            [system_key],
            |row| row.get(0),
        )
        .map_err(Error::from)
}
