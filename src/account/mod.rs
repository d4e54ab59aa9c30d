mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;

pub use core::{
    AccountPatch, BankAccount, NewAccount, create_account, create_account_table, get_account,
    list_accounts, update_account, update_account_balance,
};
#[cfg(test)]
pub use core::AccountType;
pub use create_endpoint::create_account_endpoint;
pub use delete_endpoint::delete_account_endpoint;
pub use edit_endpoint::edit_account_endpoint;
pub use get_endpoint::{get_account_endpoint, list_accounts_endpoint};
