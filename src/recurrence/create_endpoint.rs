//! Defines the endpoint for creating a recurrence rule.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::lock_connection,
    json_body::JsonBody,
    recurrence::{NewRecurrenceRule, RecurrenceRule, create_rule},
};

/// The state needed for creating a recurrence rule.
#[derive(Debug, Clone)]
pub struct CreateRuleState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateRuleState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a recurrence rule, responds with the created rule.
pub async fn create_rule_endpoint(
    State(state): State<CreateRuleState>,
    JsonBody(new_rule): JsonBody<NewRecurrenceRule>,
) -> Result<(StatusCode, Json<RecurrenceRule>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    create_rule(&new_rule, &connection)
        .inspect_err(|error| tracing::debug!("Could not create recurrence rule: {error}"))
        .map(|rule| (StatusCode::CREATED, Json(rule)))
}
