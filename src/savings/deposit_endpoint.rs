//! Defines the endpoints for transferring money into and out of a savings goal.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::GoalId,
    db::lock_connection,
    json_body::JsonBody,
    savings::{
        SavingsDeposit, TransferPolicy, TransferReceipt, TransferRequest, get_goal,
        list_deposits, transfer,
    },
};

/// The state needed for savings transfers.
#[derive(Debug, Clone)]
pub struct DepositState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub transfer_policy: TransferPolicy,
}

impl FromRef<AppState> for DepositState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            transfer_policy: state.transfer_policy,
        }
    }
}

/// A route handler for depositing into (positive amount) or withdrawing from
/// (negative amount) a savings goal.
///
/// Responds with the deposit record and its mirror transaction.
pub async fn create_deposit_endpoint(
    State(state): State<DepositState>,
    Path(goal_id): Path<GoalId>,
    JsonBody(request): JsonBody<TransferRequest>,
) -> Result<(StatusCode, Json<TransferReceipt>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    transfer(goal_id, &request, state.transfer_policy, &connection)
        .map(|receipt| (StatusCode::CREATED, Json(receipt)))
}

/// A route handler that lists the transfers of a savings goal, newest first.
pub async fn list_deposits_endpoint(
    State(state): State<DepositState>,
    Path(goal_id): Path<GoalId>,
) -> Result<Json<Vec<SavingsDeposit>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    // An unknown goal is a 404 rather than an empty history.
    get_goal(goal_id, &connection)?;

    list_deposits(goal_id, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        Error, FundsSource, Money,
        json_body::JsonBody,
        savings::{
            TransferPolicy, TransferRequest, create_deposit_endpoint,
            deposit_endpoint::DepositState, list_deposits_endpoint,
        },
        test_utils::{create_test_account, create_test_goal, get_test_connection},
    };

    fn get_state(policy: TransferPolicy) -> (DepositState, i64, i64) {
        let connection = get_test_connection();
        let account = create_test_account(&connection, 1000);
        let goal = create_test_goal(&connection, account.id, 5000);
        let state = DepositState {
            db_connection: Arc::new(Mutex::new(connection)),
            transfer_policy: policy,
        };

        (state, goal.id, account.id)
    }

    fn request(account_id: i64, amount: i64, date: time::Date) -> TransferRequest {
        TransferRequest {
            bank_account_id: account_id,
            amount: Money::from_units(amount),
            date,
            notes: None,
        }
    }

    #[tokio::test]
    async fn deposit_responds_with_receipt() {
        let (state, goal_id, account_id) = get_state(TransferPolicy::default());

        let (status, Json(receipt)) = create_deposit_endpoint(
            State(state),
            Path(goal_id),
            JsonBody(request(account_id, 250, date!(2025 - 06 - 01))),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(receipt.deposit.savings_goal_id, goal_id);
        assert_eq!(receipt.deposit.transaction_id, receipt.transaction.id);
    }

    #[tokio::test]
    async fn uses_policy_from_state() {
        let (state, goal_id, account_id) = get_state(TransferPolicy::default());

        let result = create_deposit_endpoint(
            State(state),
            Path(goal_id),
            JsonBody(request(account_id, 2000, date!(2025 - 06 - 01))),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::InsufficientFunds(FundsSource::BankAccount))
        );

        let (state, goal_id, account_id) = get_state(TransferPolicy {
            reject_goal_overdraft: true,
            reject_account_overdraft: false,
        });

        let result = create_deposit_endpoint(
            State(state),
            Path(goal_id),
            JsonBody(request(account_id, 2000, date!(2025 - 06 - 01))),
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn lists_history_newest_first() {
        let (state, goal_id, account_id) = get_state(TransferPolicy::default());
        for (amount, date) in [
            (100, date!(2025 - 01 - 01)),
            (200, date!(2025 - 03 - 01)),
            (-50, date!(2025 - 02 - 01)),
        ] {
            create_deposit_endpoint(
                State(state.clone()),
                Path(goal_id),
                JsonBody(request(account_id, amount, date)),
            )
            .await
            .unwrap();
        }

        let Json(history) = list_deposits_endpoint(State(state), Path(goal_id))
            .await
            .unwrap();

        let amounts: Vec<Money> = history.iter().map(|deposit| deposit.amount).collect();
        assert_eq!(
            amounts,
            vec![
                Money::from_units(200),
                Money::from_units(-50),
                Money::from_units(100)
            ]
        );
    }

    #[tokio::test]
    async fn history_of_missing_goal_is_not_found() {
        let (state, goal_id, _) = get_state(TransferPolicy::default());

        let result = list_deposits_endpoint(State(state), Path(goal_id + 1)).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
