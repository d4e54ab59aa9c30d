use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::RecurrenceRuleId, db::lock_connection, recurrence::delete_rule,
};

/// The state needed to delete a recurrence rule.
#[derive(Debug, Clone)]
pub struct DeleteRuleState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteRuleState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a recurrence rule, responds with 204 No Content.
pub async fn delete_rule_endpoint(
    State(state): State<DeleteRuleState>,
    Path(rule_id): Path<RecurrenceRuleId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    match delete_rule(rule_id, &connection)? {
        0 => Err(Error::NotFound),
        _ => Ok(StatusCode::NO_CONTENT),
    }
}
