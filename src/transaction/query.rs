//! Filtering for the transaction listing.

use rusqlite::{Connection, params_from_iter, types::Value};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    database_id::{AccountId, CategoryId},
    transaction::{Transaction, TransactionScope, TransactionType, core::map_transaction_row},
};

/// Defines which transactions [query_transactions] should return.
///
/// Every field is optional, unset fields do not filter anything. This is also
/// the query string of the transaction listing, e.g.
/// `?startDate=2025-01-01&endDate=2025-01-31&type=expense`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    /// Include transactions on or after this date.
    pub start_date: Option<Date>,
    /// Include transactions on or before this date.
    pub end_date: Option<Date>,
    pub account_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub scope: Option<TransactionScope>,
    pub is_paid: Option<bool>,
    /// Text to look for in the description. Only ASCII letters are matched
    /// case-insensitively, other characters must match exactly.
    pub search: Option<String>,
}

/// Query for transactions in the database, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is a SQL error.
pub fn query_transactions(
    filter: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut query_string_parts = vec![
        "SELECT id, description, amount, type, date, is_paid, category_id, bank_account_id, scope, notes, recurrence_rule_id \
         FROM \"transaction\""
            .to_string(),
    ];
    let mut where_clause_parts: Vec<String> = vec![];
    let mut query_parameters: Vec<Value> = vec![];

    let mut push_condition = |condition: &str, value: Value| {
        query_parameters.push(value);
        where_clause_parts.push(format!("{condition} ?{}", query_parameters.len()));
    };

    if let Some(start_date) = filter.start_date {
        push_condition("date >=", Value::Text(start_date.to_string()));
    }
    if let Some(end_date) = filter.end_date {
        push_condition("date <=", Value::Text(end_date.to_string()));
    }
    if let Some(account_id) = filter.account_id {
        push_condition("bank_account_id =", Value::Integer(account_id));
    }
    if let Some(category_id) = filter.category_id {
        push_condition("category_id =", Value::Integer(category_id));
    }
    if let Some(transaction_type) = filter.transaction_type {
        push_condition("type =", Value::Text(transaction_type.as_str().to_owned()));
    }
    if let Some(scope) = filter.scope {
        push_condition("scope =", Value::Text(scope.as_str().to_owned()));
    }
    if let Some(is_paid) = filter.is_paid {
        push_condition("is_paid =", Value::Integer(is_paid.into()));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        // SQLite's LOWER only folds ASCII, so the search text must be folded the same way.
        push_condition(
            "LOWER(description) LIKE",
            Value::Text(format!("%{}%", escape_like(&search.to_ascii_lowercase()))),
        );
        // The escape character applies to the LIKE that was just added.
        if let Some(last) = where_clause_parts.last_mut() {
            last.push_str(" ESCAPE '\\'");
        }
    }

    if !where_clause_parts.is_empty() {
        query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
    }

    // Sort by date, and then ID to keep transaction order stable.
    query_string_parts.push("ORDER BY date DESC, id DESC".to_string());

    let query_string = query_string_parts.join(" ");

    connection
        .prepare(&query_string)?
        .query_map(params_from_iter(query_parameters.iter()), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
