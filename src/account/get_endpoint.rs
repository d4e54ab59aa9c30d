//! Defines the endpoints for reading accounts.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{BankAccount, get_account, list_accounts},
    database_id::AccountId,
    db::lock_connection,
};

/// The state needed to read accounts.
#[derive(Debug, Clone)]
pub struct AccountsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that lists every account.
pub async fn list_accounts_endpoint(
    State(state): State<AccountsState>,
) -> Result<Json<Vec<BankAccount>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_accounts(&connection).map(Json)
}

/// A route handler for getting a single account, responds with 404 if it does not exist.
pub async fn get_account_endpoint(
    State(state): State<AccountsState>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<BankAccount>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_account(account_id, &connection).map(Json)
}
