//! The shared state for the transaction route handlers.

use axum::extract::FromRef;

use crate::{
    AppState, Error, database_id::TransactionId, pagination::PaginationConfig,
    transaction::sqlite_store::SQLiteTransactionStore,
};

/// The state needed to read and write transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The store holding every transaction.
    pub store: SQLiteTransactionStore,
    /// The defaults and limits for paging through transactions.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: SQLiteTransactionStore::new(state.db_connection.clone()),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Parse a transaction ID taken from a URL path.
///
/// # Errors
/// Returns [Error::NotFound] if `text` cannot name a stored transaction.
pub fn parse_transaction_id(text: &str) -> Result<TransactionId, Error> {
    text.parse().map_err(|_| Error::NotFound)
}
