//! Recurring transactions.
//!
//! A recurrence rule describes a transaction that repeats weekly, monthly or
//! yearly. Processing recurrences turns every due occurrence into an unpaid
//! transaction linked back to its rule.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;
mod process_endpoint;
mod schedule;

pub use core::{
    Frequency, NewRecurrenceRule, RecurrenceRule, create_recurrence_rule_table, create_rule,
    delete_rule, list_rules, process_recurrences,
};
pub use create_endpoint::create_rule_endpoint;
pub use delete_endpoint::delete_rule_endpoint;
pub use list_endpoint::list_rules_endpoint;
pub use process_endpoint::process_recurrences_endpoint;
