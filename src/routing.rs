//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;

use crate::{
    AppState, Error,
    account::{
        create_account_endpoint, delete_account_endpoint, edit_account_endpoint,
        get_account_endpoint, list_accounts_endpoint,
    },
    category::{create_category_endpoint, get_category_endpoint, list_categories_endpoint},
    endpoints,
    logging::logging_middleware,
    recurrence::{
        create_rule_endpoint, delete_rule_endpoint, list_rules_endpoint,
        process_recurrences_endpoint,
    },
    savings::{
        create_deposit_endpoint, create_goal_endpoint, delete_goal_endpoint, edit_goal_endpoint,
        get_goal_endpoint, list_deposits_endpoint, list_goals_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::ACCOUNTS,
            get(list_accounts_endpoint).post(create_account_endpoint),
        )
        .route(
            endpoints::ACCOUNT,
            get(get_account_endpoint)
                .patch(edit_account_endpoint)
                .delete(delete_account_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(endpoints::CATEGORY, get(get_category_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::SAVINGS_GOALS,
            get(list_goals_endpoint).post(create_goal_endpoint),
        )
        .route(
            endpoints::SAVINGS_GOAL,
            get(get_goal_endpoint)
                .patch(edit_goal_endpoint)
                .delete(delete_goal_endpoint),
        )
        .route(
            endpoints::SAVINGS_DEPOSITS,
            get(list_deposits_endpoint).post(create_deposit_endpoint),
        )
        .route(
            endpoints::RECURRENCES,
            get(list_rules_endpoint).post(create_rule_endpoint),
        )
        .route(endpoints::RECURRENCE, delete(delete_rule_endpoint))
        .route(
            endpoints::PROCESS_RECURRENCES,
            post(process_recurrences_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}
