//! Defines the endpoint for listing transactions.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::lock_connection,
    transaction::{Transaction, TransactionQuery, query_transactions},
};

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that lists transactions matching the query string, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Query(filter): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    query_transactions(&filter, &connection).map(Json)
}
