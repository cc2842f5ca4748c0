//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, partial updates and summaries
//! - Payload validation
//! - The `TransactionStore` trait and its SQLite implementation
//! - The list/filter/summary query and the JSON route handlers

mod core;
mod create_endpoint;
mod delete_endpoint;
mod get_endpoint;
mod list;
mod list_endpoint;
mod service;
mod sqlite_store;
mod state;
mod store;
mod update_endpoint;
mod validation;

pub use core::{
    InvalidTransactionType, NewTransaction, Summary, Transaction, TransactionPatch,
    TransactionType,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list::{ListQuery, TransactionPage, list_transactions, load_unfiltered_snapshot};
pub use list_endpoint::list_transactions_endpoint;
pub use service::{create_transaction, delete_transaction, get_transaction, update_transaction};
pub use sqlite_store::{SQLiteTransactionStore, create_transaction_table};
pub use state::{TransactionState, parse_transaction_id};
pub use store::{
    GroupField, GroupSum, Sort, SortField, SortOrder, SumField, TransactionFilter,
    TransactionStore,
};
pub use update_endpoint::update_transaction_endpoint;
pub use validation::FieldError;
