//! Defines the endpoint for creating a new category.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, NewCategory, create_category},
    db::lock_connection,
    json_body::JsonBody,
};

/// The state needed to create a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new category, responds with the created category.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    JsonBody(category): JsonBody<NewCategory>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    create_category(&category, &connection).map(|category| (StatusCode::CREATED, Json(category)))
}
