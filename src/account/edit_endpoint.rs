//! Defines the endpoint for updating an account
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{AccountPatch, BankAccount, update_account},
    database_id::AccountId,
    db::lock_connection,
    json_body::JsonBody,
};

/// The state needed to edit an account.
#[derive(Debug, Clone)]
pub struct EditAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for partially updating an account, responds with the updated account.
pub async fn edit_account_endpoint(
    State(state): State<EditAccountState>,
    Path(account_id): Path<AccountId>,
    JsonBody(patch): JsonBody<AccountPatch>,
) -> Result<Json<BankAccount>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    if let Some(balance) = patch.current_balance {
        tracing::info!("Adjusting balance of account {account_id} to {balance}");
    }

    update_account(account_id, &patch, &connection)
        .inspect_err(|error| tracing::debug!("Could not update account {account_id}: {error}"))
        .map(Json)
}
