use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::TransactionId, db::lock_connection};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with 204 No Content.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    match delete_transaction(transaction_id, &connection) {
        Ok(0) => Err(Error::NotFound),
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(error) => {
            tracing::debug!("Could not delete transaction {transaction_id}: {error}");
            Err(error)
        }
    }
}

type RowsAffected = usize;

/// Delete a transaction unless it mirrors a savings transfer.
///
/// # Errors
/// Returns [Error::LinkedTransaction] if a savings deposit refers to the transaction.
fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<RowsAffected, Error> {
    let is_linked: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM savings_deposit WHERE transaction_id = :id)",
        &[(":id", &id)],
        |row| row.get(0),
    )?;

    if is_linked {
        return Err(Error::LinkedTransaction);
    }

    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id",
            &[(":id", &id)],
        )
        .map_err(|err| err.into())
}
