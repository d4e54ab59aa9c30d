//! Defines the endpoint for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{BankAccount, NewAccount, create_account},
    db::lock_connection,
    json_body::JsonBody,
};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new account, responds with the created account.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    JsonBody(account): JsonBody<NewAccount>,
) -> Result<(StatusCode, Json<BankAccount>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    let account = create_account(&account, &connection).inspect_err(|error| {
        tracing::debug!("Could not create account with {account:?}: {error}")
    })?;

    Ok((StatusCode::CREATED, Json(account)))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State, http::StatusCode};

    use crate::{
        Error, Money,
        account::{
            AccountType, NewAccount, create_account_endpoint, create_endpoint::CreateAccountState,
            get_account,
        },
        json_body::JsonBody,
        test_utils::get_test_connection,
    };

    fn get_test_state() -> CreateAccountState {
        CreateAccountState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        }
    }

    #[tokio::test]
    async fn can_create_account() {
        let state = get_test_state();
        let form = NewAccount {
            name: "Nubank".to_owned(),
            account_type: AccountType::Checking,
            color: "#820ad1".to_owned(),
            current_balance: Money::from_cents(125050),
        };

        let (status, Json(account)) =
            create_account_endpoint(State(state.clone()), JsonBody(form))
                .await
                .expect("could not create account");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(account.current_balance, Money::from_cents(125050));
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_account(account.id, &connection), Ok(account));
    }

    #[tokio::test]
    async fn rejects_empty_name() {
        let state = get_test_state();
        let form = NewAccount {
            name: String::new(),
            account_type: AccountType::Cash,
            color: "#000".to_owned(),
            current_balance: Money::ZERO,
        };

        let result = create_account_endpoint(State(state), JsonBody(form)).await;

        assert_eq!(result.err(), Some(Error::EmptyName));
    }
}
