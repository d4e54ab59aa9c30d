use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::GoalId, db::lock_connection, savings::delete_goal};

/// The state needed to delete a savings goal.
#[derive(Debug, Clone)]
pub struct DeleteGoalState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an empty savings goal, responds with 204 No Content.
pub async fn delete_goal_endpoint(
    State(state): State<DeleteGoalState>,
    Path(goal_id): Path<GoalId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_goal(goal_id, &connection)
        .inspect_err(|error| tracing::debug!("Could not delete savings goal {goal_id}: {error}"))
        .map(|_| StatusCode::NO_CONTENT)
}
