//! Transaction management.
//!
//! This module contains everything related to the transaction log:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying and deleting transactions
//! - Route handlers for the transaction endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;
mod query;

pub use core::{
    Transaction, TransactionBuilder, TransactionScope, TransactionType, create_transaction,
    create_transaction_table,
};
#[cfg(test)]
pub use core::get_transaction;
pub(crate) use core::row_exists;
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use query::{TransactionQuery, query_transactions};
