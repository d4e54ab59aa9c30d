//! Defines the endpoint that generates due recurring transactions.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, db::lock_connection, recurrence::process_recurrences,
    timezone::local_today,
};

/// The state needed to process recurrences.
#[derive(Debug, Clone)]
pub struct ProcessRecurrencesState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The canonical timezone used to decide what "today" is.
    pub local_timezone: String,
}

impl FromRef<AppState> for ProcessRecurrencesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The response body of a recurrence processing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSummary {
    pub processed: bool,
    pub generated_count: usize,
    pub message: String,
}

/// A route handler that generates every recurring transaction due up to today.
///
/// Meant to be called by a scheduler such as cron.
pub async fn process_recurrences_endpoint(
    State(state): State<ProcessRecurrencesState>,
) -> Result<Json<ProcessSummary>, Error> {
    let today = local_today(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let connection = lock_connection(&state.db_connection)?;
    let generated = process_recurrences(today, &connection)?;

    Ok(Json(ProcessSummary {
        processed: true,
        generated_count: generated.len(),
        message: format!(
            "Successfully processed recurrences. Generated {} transactions.",
            generated.len()
        ),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};
    use time::macros::date;

    use crate::{
        Error, Money,
        recurrence::{
            Frequency, NewRecurrenceRule, create_rule, process_endpoint::ProcessRecurrencesState,
            process_recurrences_endpoint,
        },
        test_utils::{create_test_account, create_test_category, get_test_connection},
        transaction::{TransactionScope, TransactionType},
    };

    #[tokio::test]
    async fn reports_generated_count() {
        let connection = get_test_connection();
        let account = create_test_account(&connection, 0);
        let category = create_test_category(&connection, TransactionType::Income);
        create_rule(
            &NewRecurrenceRule {
                description: "Salary".to_owned(),
                amount: Money::from_units(3000),
                transaction_type: TransactionType::Income,
                scope: TransactionScope::Personal,
                frequency: Frequency::Yearly,
                start_date: date!(2020 - 01 - 01),
                end_date: Some(date!(2022 - 06 - 30)),
                bank_account_id: account.id,
                category_id: category.id,
            },
            &connection,
        )
        .unwrap();
        let state = ProcessRecurrencesState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let Json(summary) = process_recurrences_endpoint(State(state)).await.unwrap();

        assert!(summary.processed);
        assert_eq!(summary.generated_count, 3);
        assert_eq!(
            summary.message,
            "Successfully processed recurrences. Generated 3 transactions."
        );
    }

    #[tokio::test]
    async fn unknown_timezone_is_an_error() {
        let state = ProcessRecurrencesState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
            local_timezone: "Mars/Olympus_Mons".to_owned(),
        };

        let result = process_recurrences_endpoint(State(state)).await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()))
        );
    }
}
