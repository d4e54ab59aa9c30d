mod core;
mod create_endpoint;
mod get_endpoint;

pub use core::{
    Category, NewCategory, create_category, create_category_table, get_category,
    get_savings_category, list_categories, seed_system_categories,
};
pub use create_endpoint::create_category_endpoint;
pub use get_endpoint::{get_category_endpoint, list_categories_endpoint};
