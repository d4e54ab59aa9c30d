//! Defines the endpoint for updating a savings goal.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::GoalId,
    db::lock_connection,
    json_body::JsonBody,
    savings::{GoalPatch, SavingsGoal, update_goal},
};

/// The state needed to edit a savings goal.
#[derive(Debug, Clone)]
pub struct EditGoalState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for partially updating a savings goal, responds with the updated goal.
///
/// The amount saved cannot be changed here, use the deposits endpoint instead.
pub async fn edit_goal_endpoint(
    State(state): State<EditGoalState>,
    Path(goal_id): Path<GoalId>,
    JsonBody(patch): JsonBody<GoalPatch>,
) -> Result<Json<SavingsGoal>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_goal(goal_id, &patch, &connection)
        .inspect_err(|error| tracing::debug!("Could not update savings goal {goal_id}: {error}"))
        .map(Json)
}
