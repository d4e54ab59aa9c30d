//! Defines the endpoint for creating a savings goal.
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
    savings::{NewGoal, SavingsGoal, create_goal},
};

/// The state needed for creating a savings goal.
#[derive(Debug, Clone)]
pub struct CreateGoalState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new savings goal, responds with the created goal.
pub async fn create_goal_endpoint(
    State(state): State<CreateGoalState>,
    JsonBody(new_goal): JsonBody<NewGoal>,
) -> Result<(StatusCode, Json<SavingsGoal>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    create_goal(&new_goal, &connection)
        .inspect_err(|error| tracing::debug!("Could not create savings goal: {error}"))
        .map(|goal| (StatusCode::CREATED, Json(goal)))
}
