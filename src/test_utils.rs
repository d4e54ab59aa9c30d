//! Helpers shared by the unit tests.
#![allow(missing_docs)]

use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Money, TransferPolicy,
    account::{AccountType, BankAccount, NewAccount, create_account},
    category::{Category, NewCategory, create_category},
    database_id::AccountId,
    db::initialize,
    savings::{NewGoal, SavingsGoal, create_goal},
    transaction::{Transaction, TransactionScope, TransactionType, create_transaction},
};

#[track_caller]
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");
    connection
}

pub(crate) fn get_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    AppState::new(connection, "Etc/UTC", TransferPolicy::default())
        .expect("Could not create app state.")
}

/// Create an active checking account holding `balance` whole currency units.
#[track_caller]
pub(crate) fn create_test_account(connection: &Connection, balance: i64) -> BankAccount {
    create_account(
        &NewAccount {
            name: "Test account".to_owned(),
            account_type: AccountType::Checking,
            color: "#820ad1".to_owned(),
            current_balance: Money::from_units(balance),
        },
        connection,
    )
    .expect("Could not create test account")
}

#[track_caller]
pub(crate) fn create_test_category(
    connection: &Connection,
    transaction_type: TransactionType,
) -> Category {
    create_category(
        &NewCategory {
            name: "Test category".to_owned(),
            transaction_type,
            scope: TransactionScope::Personal,
            icon: None,
            color: "#ff6347".to_owned(),
        },
        connection,
    )
    .expect("Could not create test category")
}

/// Create an empty savings goal named "Test goal" with a target of `target` whole currency units.
#[track_caller]
pub(crate) fn create_test_goal(
    connection: &Connection,
    account_id: AccountId,
    target: i64,
) -> SavingsGoal {
    create_goal(
        &NewGoal {
            name: "Test goal".to_owned(),
            target_amount: Money::from_units(target),
            deadline: None,
            bank_account_id: account_id,
            color: "#00a86b".to_owned(),
        },
        connection,
    )
    .expect("Could not create test goal")
}

/// Create an unpaid expense in a new test category.
#[track_caller]
pub(crate) fn create_test_transaction(
    connection: &Connection,
    account_id: AccountId,
    amount: Money,
    date: Date,
) -> Transaction {
    let category = create_test_category(connection, TransactionType::Expense);

    create_transaction(
        Transaction::build(
            account_id,
            category.id,
            TransactionType::Expense,
            amount,
            date,
            "Test transaction",
        ),
        connection,
    )
    .expect("Could not create test transaction")
}
