//! The savings transfer ledger.
//!
//! A transfer moves a signed amount between a savings goal and a bank account.
//! Every committed transfer creates one [SavingsDeposit] and one mirror
//! [Transaction], and updates the goal and account balances by equal and
//! opposite amounts. All four writes happen in a single SQLite transaction.

use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, FundsSource, Money,
    account::{get_account, update_account_balance},
    category::get_savings_category,
    database_id::{AccountId, GoalId},
    savings::{
        deposit::{NewDeposit, SavingsDeposit, create_deposit},
        goal::{get_goal, update_goal_balance},
    },
    transaction::{Transaction, TransactionType, create_transaction},
};

/// Which balance guards apply to savings transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPolicy {
    /// Reject withdrawals larger than the amount saved in the goal.
    pub reject_goal_overdraft: bool,
    /// Reject deposits larger than the balance of the funding account.
    pub reject_account_overdraft: bool,
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            reject_goal_overdraft: true,
            reject_account_overdraft: true,
        }
    }
}

/// A request to move money into (positive `amount`) or out of (negative
/// `amount`) a savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// The account the money comes from, or returns to for a withdrawal.
    pub bank_account_id: AccountId,
    pub amount: Money,
    pub date: Date,
    #[serde(default)]
    pub notes: Option<String>,
}

/// The records created by a committed transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub deposit: SavingsDeposit,
    /// The mirror transaction posted against the bank account.
    pub transaction: Transaction,
}

/// Move `request.amount` between the savings goal `goal_id` and the bank account
/// `request.bank_account_id`.
///
/// A positive amount is a deposit: the goal grows and the account shrinks by
/// the amount. A negative amount is a withdrawal and does the opposite. Calling
/// this twice with the same request makes two transfers.
///
/// Either every record and balance is written or, on error, nothing is.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is zero or a new balance would overflow,
/// - or [Error::NotFound] if the goal or the account does not exist,
/// - or [Error::InactiveAccount] if the account has been deactivated,
/// - or [Error::InsufficientFunds] if a balance guard enabled in `policy` rejects the transfer,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn transfer(
    goal_id: GoalId,
    request: &TransferRequest,
    policy: TransferPolicy,
    connection: &Connection,
) -> Result<TransferReceipt, Error> {
    apply_transfer(goal_id, request, policy, connection).inspect_err(|error| {
        tracing::debug!(
            "Rejected transfer of {} between goal {goal_id} and account {}: {error}",
            request.amount,
            request.bank_account_id
        )
    })
}

fn apply_transfer(
    goal_id: GoalId,
    request: &TransferRequest,
    policy: TransferPolicy,
    connection: &Connection,
) -> Result<TransferReceipt, Error> {
    if request.amount.is_zero() {
        return Err(Error::InvalidAmount);
    }

    let magnitude = request.amount.checked_abs().ok_or(Error::InvalidAmount)?;
    let is_deposit = request.amount.is_positive();

    // Takes the write lock up front so the balances read below cannot go stale.
    let sql_transaction =
        rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let goal = get_goal(goal_id, &sql_transaction)?;
    let account = get_account(request.bank_account_id, &sql_transaction)?;

    if !account.is_active {
        return Err(Error::InactiveAccount(account.id));
    }

    if is_deposit {
        if policy.reject_account_overdraft && magnitude > account.current_balance {
            return Err(Error::InsufficientFunds(FundsSource::BankAccount));
        }
    } else if policy.reject_goal_overdraft && magnitude > goal.current_amount {
        return Err(Error::InsufficientFunds(FundsSource::SavingsGoal));
    }

    let new_goal_amount = goal
        .current_amount
        .checked_add(request.amount)
        .ok_or(Error::InvalidAmount)?;
    let new_account_balance = account
        .current_balance
        .checked_sub(request.amount)
        .ok_or(Error::InvalidAmount)?;

    let (transaction_type, description, default_notes) = if is_deposit {
        (
            TransactionType::Expense,
            format!("Deposit to: {}", goal.name),
            "Savings goal deposit",
        )
    } else {
        (
            TransactionType::Income,
            format!("Withdrawal from: {}", goal.name),
            "Savings goal withdrawal",
        )
    };

    let notes = request
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|notes| !notes.is_empty())
        .map(str::to_owned);

    let category_id = get_savings_category(transaction_type, &sql_transaction)?;
    let transaction = create_transaction(
        Transaction::build(
            account.id,
            category_id,
            transaction_type,
            magnitude,
            request.date,
            &description,
        )
        .paid(true)
        .notes(Some(
            notes.clone().unwrap_or_else(|| default_notes.to_owned()),
        )),
        &sql_transaction,
    )?;

    let deposit = create_deposit(
        &NewDeposit {
            savings_goal_id: goal.id,
            bank_account_id: account.id,
            transaction_id: transaction.id,
            amount: request.amount,
            date: request.date,
            notes,
        },
        &sql_transaction,
    )?;

    update_goal_balance(goal.id, new_goal_amount, &sql_transaction)?;
    update_account_balance(account.id, new_account_balance, &sql_transaction)?;

    sql_transaction.commit()?;

    if is_deposit {
        tracing::info!(
            "Deposited {magnitude} from account {} into goal {}, goal now holds {new_goal_amount}",
            account.id,
            goal.id
        );
    } else {
        tracing::info!(
            "Withdrew {magnitude} from goal {} into account {}, goal now holds {new_goal_amount}",
            goal.id,
            account.id
        );
    }

    Ok(TransferReceipt {
        deposit,
        transaction,
    })
}
