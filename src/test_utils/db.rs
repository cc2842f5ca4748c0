use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    AppState, PaginationConfig, SQLiteTransactionStore, db::initialize,
    transaction::TransactionState,
};

pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

pub(crate) fn get_test_store() -> SQLiteTransactionStore {
    SQLiteTransactionStore::new(Arc::new(Mutex::new(get_test_connection())))
}

pub(crate) fn get_test_transaction_state() -> TransactionState {
    TransactionState {
        store: get_test_store(),
        pagination_config: PaginationConfig::default(),
    }
}

pub(crate) fn get_test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(connection, PaginationConfig::default()).expect("Could not create app state")
}
