//! Simple Money is a JSON API for tracking personal and business finances.
//!
//! The API manages bank accounts, categories, transactions, recurring
//! transaction rules and savings goals. Moving money into or out of a savings
//! goal is handled by the savings transfer ledger, which mirrors every transfer
//! with a transaction against a bank account and updates both balances in one
//! database transaction.

use std::{fmt, net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod account;
mod app_state;
mod category;
mod database_id;
mod db;
mod endpoints;
mod json_body;
mod logging;
mod money;
mod recurrence;
mod routing;
mod savings;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use money::Money;
pub use routing::build_router;
pub use savings::TransferPolicy;

use crate::database_id::{AccountId, CategoryId};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// Which balance could not cover a savings transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundsSource {
    /// Withdrawing more than the savings goal holds.
    SavingsGoal,
    /// Depositing more than the bank account holds.
    BankAccount,
}

impl fmt::Display for FundsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FundsSource::SavingsGoal => write!(f, "savings goal"),
            FundsSource::BankAccount => write!(f, "bank account"),
        }
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A savings transfer was requested for an amount of zero, or the amount
    /// would overflow a balance.
    #[error("the transfer amount must be non-zero and within range")]
    InvalidAmount,

    /// A transaction or recurrence rule was given an amount that is not
    /// strictly positive. The direction of money is carried by its type.
    #[error("the amount must be greater than zero")]
    NonPositiveAmount,

    /// A savings goal target must be greater than zero.
    #[error("the target amount must be greater than zero")]
    InvalidTargetAmount,

    /// The balance on one side of a savings transfer cannot cover it.
    #[error("insufficient funds in the {0}")]
    InsufficientFunds(FundsSource),

    /// The bank account exists but has been deactivated.
    #[error("the bank account {0} is not active")]
    InactiveAccount(AccountId),

    /// A request body referenced a bank account that does not exist.
    #[error("the account ID {0} does not refer to a valid account")]
    InvalidAccount(AccountId),

    /// A request body referenced a category that does not exist.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// An empty string was used as a name.
    #[error("name cannot be empty")]
    EmptyName,

    /// An empty string was used as a transaction description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// Tried to delete an account that savings goals or savings transfers refer to.
    #[error("the account is used by savings goals or savings transfers")]
    AccountInUse,

    /// Tried to delete a savings goal that still holds money.
    #[error("the savings goal still holds money, withdraw it before deleting the goal")]
    GoalNotEmpty,

    /// Tried to delete a savings goal that money has been transferred into or
    /// out of. Its deposit history is kept for good.
    #[error("the savings goal has a deposit history and cannot be deleted")]
    GoalHasDeposits,

    /// Tried to delete a transaction that mirrors a savings transfer.
    #[error("the transaction is part of a savings transfer and cannot be deleted")]
    LinkedTransaction,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A request body was not valid JSON or did not have the expected fields
    /// and types, e.g. an amount that is not a number.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// A request or response body could not be read.
    #[error("could not read the message body")]
    BodyReadError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The HTTP status code.
    pub code: u16,
    /// A human readable description of what went wrong.
    pub message: String,
}

impl Error {
    /// The HTTP status code that best describes the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidAmount
            | Error::NonPositiveAmount
            | Error::InvalidTargetAmount
            | Error::InsufficientFunds(_)
            | Error::InactiveAccount(_)
            | Error::InvalidAccount(_)
            | Error::InvalidCategory(_)
            | Error::EmptyName
            | Error::EmptyDescription
            | Error::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Error::AccountInUse
            | Error::GoalNotEmpty
            | Error::GoalHasDeposits
            | Error::LinkedTransaction => StatusCode::CONFLICT,
            Error::InvalidTimezoneError(_)
            | Error::DatabaseLockError
            | Error::BodyReadError
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal details are only intended for the server logs.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (
            status,
            Json(ErrorBody {
                code: status.as_u16(),
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Error, FundsSource};

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(Error::from(rusqlite::Error::QueryReturnedNoRows), Error::NotFound);
    }

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(Error::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::InvalidAmount.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::InsufficientFunds(FundsSource::SavingsGoal).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::GoalNotEmpty.status_code(), StatusCode::CONFLICT);
        assert_eq!(Error::GoalHasDeposits.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            Error::InvalidBody("missing field `date`".to_owned()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::DatabaseLockError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn response_body_has_code_and_message() {
        let response = Error::InsufficientFunds(FundsSource::BankAccount).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["code"], 400);
        assert_eq!(body["message"], "insufficient funds in the bank account");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = Error::SqlError(rusqlite::Error::InvalidQuery).into_response();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["code"], 500);
        assert!(!body["message"].as_str().unwrap().contains("SQL"));
    }
}
