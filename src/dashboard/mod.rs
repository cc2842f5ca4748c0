//! Dashboard module
//!
//! Provides the overview page with summary cards, charts, the filter panel and
//! the paginated transactions table, plus the pages for adding, editing and
//! deleting transactions.

mod aggregation;
mod cards;
mod categories;
mod charts;
mod client_state;
mod filters;
mod form;
mod handlers;
mod table;

pub use form::{
    create_transaction_page_endpoint, delete_transaction_page_endpoint,
    get_edit_transaction_page, get_new_transaction_page, update_transaction_page_endpoint,
};
pub use handlers::get_dashboard_page;
