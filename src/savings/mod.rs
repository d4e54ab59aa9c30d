//! Savings goals and the savings transfer ledger.
//!
//! This module contains:
//! - The `SavingsGoal` model and its database functions
//! - The `SavingsDeposit` audit trail of transfers
//! - `transfer`, which moves money between a goal and a bank account
//! - Route handlers for the savings endpoints

mod create_endpoint;
mod delete_endpoint;
mod deposit;
mod deposit_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod goal;
mod transfer;

pub use create_endpoint::create_goal_endpoint;
pub use delete_endpoint::delete_goal_endpoint;
pub use deposit::{SavingsDeposit, create_savings_deposit_table, list_deposits};
pub use deposit_endpoint::{create_deposit_endpoint, list_deposits_endpoint};
pub use edit_endpoint::edit_goal_endpoint;
pub use get_endpoint::{get_goal_endpoint, list_goals_endpoint};
pub use goal::{
    GoalPatch, NewGoal, SavingsGoal, create_goal, create_savings_goal_table, delete_goal,
    get_goal, list_goals, update_goal,
};
#[cfg(test)]
pub use goal::update_goal_balance;
pub use transfer::{TransferPolicy, TransferReceipt, TransferRequest, transfer};
