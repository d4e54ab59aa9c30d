use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::lock_connection,
    recurrence::{RecurrenceRule, list_rules},
};

#[derive(Debug, Clone)]
pub struct ListRulesState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListRulesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that lists every recurrence rule.
pub async fn list_rules_endpoint(
    State(state): State<ListRulesState>,
) -> Result<Json<Vec<RecurrenceRule>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_rules(&connection).map(Json)
}
