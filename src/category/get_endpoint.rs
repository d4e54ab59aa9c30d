//! Defines the endpoints for reading categories.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, get_category, list_categories},
    database_id::CategoryId,
    db::lock_connection,
};

/// The state needed to read categories.
#[derive(Debug, Clone)]
pub struct CategoriesState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that lists every category, system categories included.
pub async fn list_categories_endpoint(
    State(state): State<CategoriesState>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_categories(&connection).map(Json)
}

/// A route handler for getting a single category, responds with 404 if it does not exist.
pub async fn get_category_endpoint(
    State(state): State<CategoriesState>,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<Category>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_category(category_id, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
    };

    use crate::{
        Error,
        category::{get_category_endpoint, get_endpoint::CategoriesState, list_categories_endpoint},
        test_utils::{create_test_category, get_test_connection},
        transaction::TransactionType,
    };

    #[tokio::test]
    async fn lists_system_and_user_categories() {
        let connection = get_test_connection();
        let category = create_test_category(&connection, TransactionType::Income);
        let state = CategoriesState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let Json(categories) = list_categories_endpoint(State(state)).await.unwrap();

        assert_eq!(categories.len(), 3);
        assert_eq!(categories.iter().filter(|category| category.is_system).count(), 2);
        assert_eq!(categories.last(), Some(&category));
    }

    #[tokio::test]
    async fn get_missing_category_is_not_found() {
        let state = CategoriesState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let result = get_category_endpoint(State(state), Path(404)).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
