//! Defines the endpoint for deleting an account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::AccountId, db::lock_connection};

/// The state needed to delete an account.
#[derive(Debug, Clone)]
pub struct DeleteAccountState {
    /// The database connection for managing account.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an account, responds with 204 No Content.
///
/// The account's transactions are deleted with it.
pub async fn delete_account_endpoint(
    State(state): State<DeleteAccountState>,
    Path(account_id): Path<AccountId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    match delete_account(account_id, &connection) {
        Ok(0) => Err(Error::NotFound),
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(error) => {
            tracing::debug!("Could not delete account {account_id}: {error}");
            Err(error)
        }
    }
}

type RowsAffected = usize;

/// Delete the account `id` and its transactions.
///
/// # Errors
/// Returns [Error::AccountInUse] if a savings goal is parked in the account or
/// a savings transfer was made through it.
fn delete_account(id: AccountId, connection: &Connection) -> Result<RowsAffected, Error> {
    let in_use: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM savings_goal WHERE bank_account_id = :id)
             OR EXISTS(SELECT 1 FROM savings_deposit WHERE bank_account_id = :id)",
        &[(":id", &id)],
        |row| row.get(0),
    )?;

    if in_use {
        return Err(Error::AccountInUse);
    }

    connection
        .execute("DELETE FROM account WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error, Money,
        account::{delete_endpoint::delete_account, get_account},
        savings::{TransferPolicy, TransferRequest, transfer},
        test_utils::{
            create_test_account, create_test_goal, create_test_transaction, get_test_connection,
        },
        transaction::get_transaction,
    };

    #[test]
    fn deletes_account_and_its_transactions() {
        let connection = get_test_connection();
        let account = create_test_account(&connection, 100);
        let transaction =
            create_test_transaction(&connection, account.id, Money::from_units(5), date!(2025 - 01 - 02));

        let rows_affected = delete_account(account.id, &connection).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(get_account(account.id, &connection), Err(Error::NotFound));
        assert_eq!(get_transaction(transaction.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn missing_account_affects_no_rows() {
        let connection = get_test_connection();

        assert_eq!(delete_account(123, &connection), Ok(0));
    }

    #[test]
    fn refuses_account_with_savings_goal() {
        let connection = get_test_connection();
        let account = create_test_account(&connection, 100);
        create_test_goal(&connection, account.id, 1000);

        let result = delete_account(account.id, &connection);

        assert_eq!(result, Err(Error::AccountInUse));
        assert!(get_account(account.id, &connection).is_ok());
    }

    #[test]
    fn refuses_account_that_funded_a_transfer() {
        let connection = get_test_connection();
        let goal_account = create_test_account(&connection, 0);
        let funding_account = create_test_account(&connection, 300);
        let goal = create_test_goal(&connection, goal_account.id, 1000);
        let request = TransferRequest {
            bank_account_id: funding_account.id,
            amount: Money::from_units(120),
            date: date!(2025 - 04 - 01),
            notes: None,
        };
        transfer(goal.id, &request, TransferPolicy::default(), &connection).unwrap();

        let result = delete_account(funding_account.id, &connection);

        assert_eq!(result, Err(Error::AccountInUse));
        assert!(get_account(funding_account.id, &connection).is_ok());
    }
}
