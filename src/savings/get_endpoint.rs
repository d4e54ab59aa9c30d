//! Defines the endpoints for reading savings goals.
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
    savings::{SavingsGoal, get_goal, list_goals},
};

/// The state needed to read savings goals.
#[derive(Debug, Clone)]
pub struct GoalsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

pub async fn list_goals_endpoint(
    State(state): State<GoalsState>,
) -> Result<Json<Vec<SavingsGoal>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_goals(&connection).map(Json)
}

pub async fn get_goal_endpoint(
    State(state): State<GoalsState>,
    Path(goal_id): Path<GoalId>,
) -> Result<Json<SavingsGoal>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_goal(goal_id, &connection).map(Json)
}
