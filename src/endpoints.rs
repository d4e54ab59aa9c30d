//! The API endpoint URIs.
//!
//! Every route is versioned under `/v1`. Path parameters use axum's `{name}` syntax.

/// The route to list and create bank accounts.
pub const ACCOUNTS: &str = "/v1/accounts";
/// The route to get, update or delete a single bank account.
pub const ACCOUNT: &str = "/v1/accounts/{account_id}";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/v1/categories";
/// The route to get a single category.
pub const CATEGORY: &str = "/v1/categories/{category_id}";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/v1/transactions";
/// The route to delete a single transaction.
pub const TRANSACTION: &str = "/v1/transactions/{transaction_id}";
/// The route to list and create savings goals.
pub const SAVINGS_GOALS: &str = "/v1/savings";
/// The route to get, update or delete a single savings goal.
pub const SAVINGS_GOAL: &str = "/v1/savings/{goal_id}";
/// The route to transfer money into or out of a savings goal, and to list its transfers.
pub const SAVINGS_DEPOSITS: &str = "/v1/savings/{goal_id}/deposits";
/// The route to list and create recurrence rules.
pub const RECURRENCES: &str = "/v1/recurrences";
/// The route to delete a single recurrence rule.
pub const RECURRENCE: &str = "/v1/recurrences/{rule_id}";
/// The route that generates the recurring transactions that are due.
pub const PROCESS_RECURRENCES: &str = "/v1/system/process-recurrences";

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ACCOUNTS);
        assert_endpoint_is_valid_uri(endpoints::ACCOUNT);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION);
        assert_endpoint_is_valid_uri(endpoints::SAVINGS_GOALS);
        assert_endpoint_is_valid_uri(endpoints::SAVINGS_GOAL);
        assert_endpoint_is_valid_uri(endpoints::SAVINGS_DEPOSITS);
        assert_endpoint_is_valid_uri(endpoints::RECURRENCES);
        assert_endpoint_is_valid_uri(endpoints::RECURRENCE);
        assert_endpoint_is_valid_uri(endpoints::PROCESS_RECURRENCES);
    }
}
