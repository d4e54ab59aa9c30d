//! Defines the savings goal model and its database queries.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

use crate::{
    Error, Money,
    account::get_account,
    database_id::{AccountId, GoalId},
};

/// An amount of money the user is saving up towards, e.g. a holiday.
///
/// The money in a goal is nominally parked in the bank account `bank_account_id`,
/// but transfers may be funded from any active account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: GoalId,
    pub name: String,
    /// How much the user wants to save. Always greater than zero.
    pub target_amount: Money,
    /// How much has been saved so far. Only changed by savings transfers.
    pub current_amount: Money,
    pub deadline: Option<Date>,
    pub bank_account_id: AccountId,
    pub color: String,
    /// Whether `current_amount` has reached `target_amount`.
    pub is_completed: bool,
}

/// The data needed to create a [SavingsGoal].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Money,
    #[serde(default)]
    pub deadline: Option<Date>,
    pub bank_account_id: AccountId,
    pub color: String,
}

/// A partial update to a [SavingsGoal].
///
/// The current amount is deliberately absent, it only changes through transfers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    pub name: Option<String>,
    pub target_amount: Option<Money>,
    /// `Some(None)`, sent as `"deadline": null`, clears the deadline.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<Option<Date>>,
    pub bank_account_id: Option<AccountId>,
    pub color: Option<String>,
}

/// Tells an explicit `null` apart from a missing field, which serde's
/// `default` turns into `None`.
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub fn create_savings_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS savings_goal (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            target_amount INTEGER NOT NULL CHECK (target_amount > 0),
            current_amount INTEGER NOT NULL DEFAULT 0,
            deadline TEXT,
            bank_account_id INTEGER NOT NULL,
            color TEXT NOT NULL,
            FOREIGN KEY(bank_account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE RESTRICT
        )",
        (),
    )?;

    Ok(())
}

const SELECT_GOAL: &str = "SELECT id, name, target_amount, current_amount, deadline, bank_account_id, color
     FROM savings_goal";

fn map_row_to_goal(row: &Row) -> Result<SavingsGoal, rusqlite::Error> {
    let target_amount: Money = row.get(2)?;
    let current_amount: Money = row.get(3)?;

    Ok(SavingsGoal {
        id: row.get(0)?,
        name: row.get(1)?,
        target_amount,
        current_amount,
        deadline: row.get(4)?,
        bank_account_id: row.get(5)?,
        color: row.get(6)?,
        is_completed: current_amount >= target_amount,
    })
}

/// Check that `account_id` refers to an existing account.
fn validate_account(account_id: AccountId, connection: &Connection) -> Result<(), Error> {
    match get_account(account_id, connection) {
        Ok(_) => Ok(()),
        Err(Error::NotFound) => Err(Error::InvalidAccount(account_id)),
        Err(error) => Err(error),
    }
}

/// Create a new, empty savings goal.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyName] if the name is blank,
/// - or [Error::InvalidTargetAmount] if the target is not greater than zero,
/// - or [Error::InvalidAccount] if the bank account does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_goal(goal: &NewGoal, connection: &Connection) -> Result<SavingsGoal, Error> {
    let name = goal.name.trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    if !goal.target_amount.is_positive() {
        return Err(Error::InvalidTargetAmount);
    }

    validate_account(goal.bank_account_id, connection)?;

    connection
        .prepare(
            "INSERT INTO savings_goal (name, target_amount, current_amount, deadline, bank_account_id, color)
             VALUES (?1, ?2, 0, ?3, ?4, ?5)
             RETURNING id, name, target_amount, current_amount, deadline, bank_account_id, color",
        )?
        .query_row(
            params![
                name,
                goal.target_amount,
                goal.deadline,
                goal.bank_account_id,
                goal.color
            ],
            map_row_to_goal,
        )
        .map_err(Error::from)
}

/// Retrieve a savings goal by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a savings goal.
pub fn get_goal(id: GoalId, connection: &Connection) -> Result<SavingsGoal, Error> {
    connection
        .prepare(&format!("{SELECT_GOAL} WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_row_to_goal)
        .map_err(Error::from)
}

/// Retrieve all savings goals ordered by ID.
pub fn list_goals(connection: &Connection) -> Result<Vec<SavingsGoal>, Error> {
    connection
        .prepare(&format!("{SELECT_GOAL} ORDER BY id"))?
        .query_map([], map_row_to_goal)?
        .map(|maybe_goal| maybe_goal.map_err(Error::from))
        .collect()
}

/// Apply `patch` to the savings goal `id` and return the updated goal.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a savings goal,
/// - or [Error::EmptyName] if the patch would blank the name,
/// - or [Error::InvalidTargetAmount] if the new target is not greater than zero,
/// - or [Error::InvalidAccount] if the new bank account does not exist.
pub fn update_goal(
    id: GoalId,
    patch: &GoalPatch,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    let mut goal = get_goal(id, connection)?;

    if let Some(name) = &patch.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        goal.name = name.to_owned();
    }
    if let Some(target_amount) = patch.target_amount {
        if !target_amount.is_positive() {
            return Err(Error::InvalidTargetAmount);
        }
        goal.target_amount = target_amount;
    }
    if let Some(deadline) = patch.deadline {
        goal.deadline = deadline;
    }
    if let Some(account_id) = patch.bank_account_id {
        validate_account(account_id, connection)?;
        goal.bank_account_id = account_id;
    }
    if let Some(color) = &patch.color {
        goal.color.clone_from(color);
    }

    goal.is_completed = goal.current_amount >= goal.target_amount;

    connection.execute(
        "UPDATE savings_goal
         SET name = ?1, target_amount = ?2, deadline = ?3, bank_account_id = ?4, color = ?5
         WHERE id = ?6",
        params![
            goal.name,
            goal.target_amount,
            goal.deadline,
            goal.bank_account_id,
            goal.color,
            id
        ],
    )?;

    Ok(goal)
}

/// Overwrite the amount saved in goal `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a savings goal.
pub fn update_goal_balance(
    id: GoalId,
    current_amount: Money,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE savings_goal SET current_amount = ?1 WHERE id = ?2",
        params![current_amount, id],
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// Delete the savings goal `id`.
///
/// Only goals that never took part in a transfer can be deleted. Once a
/// transfer has gone through, its deposit record and mirror transaction are
/// kept for good, and so is the goal they belong to.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a savings goal,
/// - or [Error::GoalNotEmpty] if the goal still holds money,
/// - or [Error::GoalHasDeposits] if the goal has a deposit history.
pub fn delete_goal(id: GoalId, connection: &Connection) -> Result<(), Error> {
    let goal = get_goal(id, connection)?;

    if !goal.current_amount.is_zero() {
        return Err(Error::GoalNotEmpty);
    }

    let has_deposits: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM savings_deposit WHERE savings_goal_id = :id)",
        &[(":id", &id)],
        |row| row.get(0),
    )?;

    if has_deposits {
        return Err(Error::GoalHasDeposits);
    }

    connection.execute("DELETE FROM savings_goal WHERE id = :id", &[(":id", &id)])?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error, Money,
        savings::{
            GoalPatch, NewGoal, TransferPolicy, TransferRequest, create_goal, delete_goal,
            get_goal, list_deposits, list_goals, transfer, update_goal, update_goal_balance,
        },
        test_utils::{create_test_account, get_test_connection},
    };

    fn new_goal(account_id: i64, target: i64) -> NewGoal {
        NewGoal {
            name: "Holiday".to_owned(),
            target_amount: Money::from_units(target),
            deadline: Some(date!(2026 - 12 - 01)),
            bank_account_id: account_id,
            color: "#00a86b".to_owned(),
        }
    }

    #[test]
    fn create_starts_empty() {
        let conn = get_test_connection();
        let account = create_test_account(&conn, 100);

        let goal = create_goal(&new_goal(account.id, 3000), &conn).unwrap();

        assert_eq!(goal.current_amount, Money::ZERO);
        assert_eq!(goal.target_amount, Money::from_units(3000));
        assert!(!goal.is_completed);
        assert_eq!(get_goal(goal.id, &conn), Ok(goal));
    }

    #[test]
    fn create_rejects_invalid_goals() {
        let conn = get_test_connection();
        let account = create_test_account(&conn, 100);

        let mut blank_name = new_goal(account.id, 10);
        blank_name.name = " ".to_owned();
        assert_eq!(create_goal(&blank_name, &conn), Err(Error::EmptyName));

        assert_eq!(
            create_goal(&new_goal(account.id, 0), &conn),
            Err(Error::InvalidTargetAmount)
        );
        assert_eq!(
            create_goal(&new_goal(404, 10), &conn),
            Err(Error::InvalidAccount(404))
        );
        assert_eq!(list_goals(&conn), Ok(vec![]));
    }

    #[test]
    fn is_completed_once_target_is_reached() {
        let conn = get_test_connection();
        let account = create_test_account(&conn, 100);
        let goal = create_goal(&new_goal(account.id, 50), &conn).unwrap();

        update_goal_balance(goal.id, Money::from_units(50), &conn).unwrap();

        let goal = get_goal(goal.id, &conn).unwrap();
        assert!(goal.is_completed);
    }

    #[test]
    fn update_keeps_current_amount() {
        let conn = get_test_connection();
        let account = create_test_account(&conn, 100);
        let other_account = create_test_account(&conn, 100);
        let goal = create_goal(&new_goal(account.id, 50), &conn).unwrap();
        update_goal_balance(goal.id, Money::from_units(20), &conn).unwrap();

        let updated = update_goal(
            goal.id,
            &GoalPatch {
                target_amount: Some(Money::from_units(20)),
                bank_account_id: Some(other_account.id),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(updated.current_amount, Money::from_units(20));
        assert_eq!(updated.bank_account_id, other_account.id);
        assert!(updated.is_completed);
        assert_eq!(get_goal(goal.id, &conn), Ok(updated));
    }

    #[test]
    fn patch_tells_null_deadline_from_missing_deadline() {
        let missing: GoalPatch = serde_json::from_str(r#"{"name": "Car"}"#).unwrap();
        let cleared: GoalPatch = serde_json::from_str(r#"{"deadline": null}"#).unwrap();
        let moved: GoalPatch = serde_json::from_str(r#"{"deadline": "2027-03-01"}"#).unwrap();

        assert_eq!(missing.deadline, None);
        assert_eq!(cleared.deadline, Some(None));
        assert_eq!(moved.deadline, Some(Some(date!(2027 - 03 - 01))));
    }

    #[test]
    fn update_can_clear_deadline() {
        let conn = get_test_connection();
        let account = create_test_account(&conn, 100);
        let goal = create_goal(&new_goal(account.id, 50), &conn).unwrap();
        assert!(goal.deadline.is_some());

        let renamed = update_goal(
            goal.id,
            &GoalPatch {
                name: Some("Car".to_owned()),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();
        assert_eq!(renamed.deadline, goal.deadline);

        let cleared = update_goal(
            goal.id,
            &GoalPatch {
                deadline: Some(None),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(cleared.deadline, None);
        assert_eq!(get_goal(goal.id, &conn), Ok(cleared));
    }

    #[test]
    fn update_rejects_missing_account() {
        let conn = get_test_connection();
        let account = create_test_account(&conn, 100);
        let goal = create_goal(&new_goal(account.id, 50), &conn).unwrap();

        let result = update_goal(
            goal.id,
            &GoalPatch {
                bank_account_id: Some(999),
                ..Default::default()
            },
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidAccount(999)));
    }

    #[test]
    fn delete_refuses_goal_with_money() {
        let conn = get_test_connection();
        let account = create_test_account(&conn, 100);
        let goal = create_goal(&new_goal(account.id, 50), &conn).unwrap();
        update_goal_balance(goal.id, Money::from_cents(1), &conn).unwrap();

        assert_eq!(delete_goal(goal.id, &conn), Err(Error::GoalNotEmpty));

        update_goal_balance(goal.id, Money::ZERO, &conn).unwrap();
        assert_eq!(delete_goal(goal.id, &conn), Ok(()));
        assert_eq!(get_goal(goal.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_keeps_goal_with_deposit_history() {
        let conn = get_test_connection();
        let account = create_test_account(&conn, 500);
        let goal = create_goal(&new_goal(account.id, 1000), &conn).unwrap();
        for amount in [100, -100] {
            let request = TransferRequest {
                bank_account_id: account.id,
                amount: Money::from_units(amount),
                date: date!(2025 - 05 - 01),
                notes: None,
            };
            transfer(goal.id, &request, TransferPolicy::default(), &conn).unwrap();
        }
        assert_eq!(get_goal(goal.id, &conn).unwrap().current_amount, Money::ZERO);

        assert_eq!(delete_goal(goal.id, &conn), Err(Error::GoalHasDeposits));

        let deposits = list_deposits(goal.id, &conn).unwrap();
        assert_eq!(deposits.len(), 2);
        let deleted = conn.execute("DELETE FROM savings_goal WHERE id = ?1", [goal.id]);
        assert!(deleted.is_err(), "deposit records must keep their goal alive");
        assert!(get_goal(goal.id, &conn).is_ok());
    }

    #[test]
    fn delete_missing_goal_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(delete_goal(12, &conn), Err(Error::NotFound));
    }
}
