//! Defines recurring transaction rules and the job that turns them into transactions.

use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, Money,
    database_id::{AccountId, CategoryId, RecurrenceRuleId},
    recurrence::schedule::due_occurrences,
    transaction::{
        Transaction, TransactionScope, TransactionType, create_transaction, row_exists,
    },
};

/// How often a recurring transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    fn as_str(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl ToSql for Frequency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Frequency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(FromSqlError::Other(
                format!("unknown frequency \"{other}\"").into(),
            )),
        }
    }
}

/// A template for a transaction that repeats on a schedule, e.g. rent or a salary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub id: RecurrenceRuleId,
    pub description: String,
    pub amount: Money,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub scope: TransactionScope,
    pub frequency: Frequency,
    /// The date of the first occurrence.
    pub start_date: Date,
    /// No occurrences are generated after this date.
    pub end_date: Option<Date>,
    /// The date of the latest occurrence turned into a transaction.
    pub last_generated_date: Option<Date>,
    pub is_active: bool,
    pub bank_account_id: AccountId,
    pub category_id: CategoryId,
}

/// The data needed to create a [RecurrenceRule].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurrenceRule {
    pub description: String,
    pub amount: Money,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub scope: TransactionScope,
    pub frequency: Frequency,
    pub start_date: Date,
    #[serde(default)]
    pub end_date: Option<Date>,
    pub bank_account_id: AccountId,
    pub category_id: CategoryId,
}

pub fn create_recurrence_rule_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS recurrence_rule (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            amount INTEGER NOT NULL CHECK (amount > 0),
            type TEXT NOT NULL,
            scope TEXT NOT NULL,
            frequency TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT,
            last_generated_date TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            bank_account_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            FOREIGN KEY(bank_account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
        )",
        (),
    )?;

    Ok(())
}

const SELECT_RULE: &str = "SELECT id, description, amount, type, scope, frequency, start_date, end_date,
        last_generated_date, is_active, bank_account_id, category_id
     FROM recurrence_rule";

fn map_row_to_rule(row: &Row) -> Result<RecurrenceRule, rusqlite::Error> {
    Ok(RecurrenceRule {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        transaction_type: row.get(3)?,
        scope: row.get(4)?,
        frequency: row.get(5)?,
        start_date: row.get(6)?,
        end_date: row.get(7)?,
        last_generated_date: row.get(8)?,
        is_active: row.get(9)?,
        bank_account_id: row.get(10)?,
        category_id: row.get(11)?,
    })
}

/// Create a new, active recurrence rule.
///
/// Nothing is generated until recurrences are next processed.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is zero or negative,
/// - or [Error::EmptyDescription] if the description is blank,
/// - or [Error::InvalidAccount] if the bank account does not exist,
/// - or [Error::InvalidCategory] if the category does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_rule(
    rule: &NewRecurrenceRule,
    connection: &Connection,
) -> Result<RecurrenceRule, Error> {
    if !rule.amount.is_positive() {
        return Err(Error::NonPositiveAmount);
    }

    let description = rule.description.trim();
    if description.is_empty() {
        return Err(Error::EmptyDescription);
    }

    if !row_exists("account", rule.bank_account_id, connection)? {
        return Err(Error::InvalidAccount(rule.bank_account_id));
    }

    if !row_exists("category", rule.category_id, connection)? {
        return Err(Error::InvalidCategory(rule.category_id));
    }

    connection
        .prepare(
            "INSERT INTO recurrence_rule
                (description, amount, type, scope, frequency, start_date, end_date, is_active, bank_account_id, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?9)
             RETURNING id, description, amount, type, scope, frequency, start_date, end_date,
                last_generated_date, is_active, bank_account_id, category_id",
        )?
        .query_row(
            params![
                description,
                rule.amount,
                rule.transaction_type,
                rule.scope,
                rule.frequency,
                rule.start_date,
                rule.end_date,
                rule.bank_account_id,
                rule.category_id,
            ],
            map_row_to_rule,
        )
        .map_err(Error::from)
}

/// Retrieve all recurrence rules ordered by ID.
pub fn list_rules(connection: &Connection) -> Result<Vec<RecurrenceRule>, Error> {
    connection
        .prepare(&format!("{SELECT_RULE} ORDER BY id"))?
        .query_map([], map_row_to_rule)?
        .map(|maybe_rule| maybe_rule.map_err(Error::from))
        .collect()
}

/// Delete a recurrence rule. Transactions it already generated are kept.
pub fn delete_rule(id: RecurrenceRuleId, connection: &Connection) -> Result<usize, Error> {
    connection
        .execute("DELETE FROM recurrence_rule WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

/// Generate a transaction for every occurrence of every active rule that is
/// due on or before `today`, and return the new transactions.
///
/// Missed occurrences are all caught up in one run. Generated transactions are
/// unpaid. Either all due transactions are generated or, on error, none are.
///
/// # Errors
/// Returns [Error::SqlError] if any transaction could not be created.
pub fn process_recurrences(today: Date, connection: &Connection) -> Result<Vec<Transaction>, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let rules: Vec<RecurrenceRule> = sql_transaction
        .prepare(&format!("{SELECT_RULE} WHERE is_active = 1 ORDER BY id"))?
        .query_map([], map_row_to_rule)?
        .collect::<Result<_, _>>()?;

    let mut generated = Vec::new();

    for rule in rules {
        let due_dates = due_occurrences(&rule, today);
        let Some(&last_date) = due_dates.last() else {
            continue;
        };

        for date in due_dates {
            let builder = Transaction::build(
                rule.bank_account_id,
                rule.category_id,
                rule.transaction_type,
                rule.amount,
                date,
                &rule.description,
            )
            .scope(rule.scope)
            .recurrence_rule_id(Some(rule.id));

            generated.push(create_transaction(builder, &sql_transaction)?);
        }

        sql_transaction.execute(
            "UPDATE recurrence_rule SET last_generated_date = ?1 WHERE id = ?2",
            params![last_date, rule.id],
        )?;

        tracing::debug!(
            "Recurrence rule {} generated transactions up to {last_date}",
            rule.id
        );
    }

    sql_transaction.commit()?;

    tracing::info!(
        "Processed recurrences for {today}, generated {} transactions",
        generated.len()
    );

    Ok(generated)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error, Money,
        recurrence::{
            Frequency, NewRecurrenceRule, create_rule, delete_rule, list_rules,
            process_recurrences,
        },
        test_utils::{create_test_account, create_test_category, get_test_connection},
        transaction::{TransactionScope, TransactionType, get_transaction},
    };

    fn new_rule(account_id: i64, category_id: i64) -> NewRecurrenceRule {
        NewRecurrenceRule {
            description: "Rent".to_owned(),
            amount: Money::from_units(450),
            transaction_type: TransactionType::Expense,
            scope: TransactionScope::Personal,
            frequency: Frequency::Monthly,
            start_date: date!(2025 - 01 - 31),
            end_date: None,
            bank_account_id: account_id,
            category_id,
        }
    }

    #[test]
    fn create_rule_succeeds() {
        let conn = get_test_connection();
        let account = create_test_account(&conn, 0);
        let category = create_test_category(&conn, TransactionType::Expense);

        let rule = create_rule(&new_rule(account.id, category.id), &conn).unwrap();

        assert!(rule.is_active);
        assert_eq!(rule.last_generated_date, None);
        assert_eq!(list_rules(&conn), Ok(vec![rule]));
    }

    #[test]
    fn create_rule_validates_input() {
        let conn = get_test_connection();
        let account = create_test_account(&conn, 0);
        let category = create_test_category(&conn, TransactionType::Expense);

        let mut rule = new_rule(account.id, category.id);
        rule.amount = Money::ZERO;
        assert_eq!(create_rule(&rule, &conn), Err(Error::NonPositiveAmount));

        let mut rule = new_rule(account.id, category.id);
        rule.description = "".to_owned();
        assert_eq!(create_rule(&rule, &conn), Err(Error::EmptyDescription));

        assert_eq!(
            create_rule(&new_rule(account.id + 10, category.id), &conn),
            Err(Error::InvalidAccount(account.id + 10))
        );
        assert_eq!(
            create_rule(&new_rule(account.id, category.id + 10), &conn),
            Err(Error::InvalidCategory(category.id + 10))
        );
    }

    #[test]
    fn process_generates_missed_occurrences() {
        let conn = get_test_connection();
        let account = create_test_account(&conn, 0);
        let category = create_test_category(&conn, TransactionType::Expense);
        let rule = create_rule(&new_rule(account.id, category.id), &conn).unwrap();

        let generated = process_recurrences(date!(2025 - 03 - 31), &conn).unwrap();

        let dates: Vec<_> = generated.iter().map(|transaction| transaction.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2025 - 01 - 31),
                date!(2025 - 02 - 28),
                date!(2025 - 03 - 31)
            ]
        );
        for transaction in &generated {
            assert_eq!(transaction.recurrence_rule_id, Some(rule.id));
            assert_eq!(transaction.amount, Money::from_units(450));
            assert!(!transaction.is_paid);
            assert_eq!(get_transaction(transaction.id, &conn).as_ref(), Ok(transaction));
        }

        let rules = list_rules(&conn).unwrap();
        assert_eq!(rules[0].last_generated_date, Some(date!(2025 - 03 - 31)));
    }

    #[test]
    fn process_is_idempotent_for_the_same_day() {
        let conn = get_test_connection();
        let account = create_test_account(&conn, 0);
        let category = create_test_category(&conn, TransactionType::Expense);
        create_rule(&new_rule(account.id, category.id), &conn).unwrap();

        let first = process_recurrences(date!(2025 - 02 - 10), &conn).unwrap();
        let second = process_recurrences(date!(2025 - 02 - 10), &conn).unwrap();
        let third = process_recurrences(date!(2025 - 02 - 28), &conn).unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(third.len(), 1);
        assert_eq!(third[0].date, date!(2025 - 02 - 28));
    }

    #[test]
    fn process_skips_inactive_rules() {
        let conn = get_test_connection();
        let account = create_test_account(&conn, 0);
        let category = create_test_category(&conn, TransactionType::Expense);
        let rule = create_rule(&new_rule(account.id, category.id), &conn).unwrap();
        conn.execute(
            "UPDATE recurrence_rule SET is_active = 0 WHERE id = ?1",
            [rule.id],
        )
        .unwrap();

        let generated = process_recurrences(date!(2025 - 12 - 31), &conn).unwrap();

        assert!(generated.is_empty());
    }

    #[test]
    fn deleting_rule_keeps_generated_transactions() {
        let conn = get_test_connection();
        let account = create_test_account(&conn, 0);
        let category = create_test_category(&conn, TransactionType::Expense);
        let rule = create_rule(&new_rule(account.id, category.id), &conn).unwrap();
        let generated = process_recurrences(date!(2025 - 01 - 31), &conn).unwrap();

        assert_eq!(delete_rule(rule.id, &conn), Ok(1));

        let transaction = get_transaction(generated[0].id, &conn).unwrap();
        assert_eq!(transaction.recurrence_rule_id, None);
    }
}
