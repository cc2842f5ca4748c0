//! Defines the endpoint for fetching a single transaction.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::transaction::{
    service::get_transaction,
    state::{TransactionState, parse_transaction_id},
};

/// A route handler for getting a transaction by its ID.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
) -> Response {
    parse_transaction_id(&transaction_id)
        .and_then(|id| get_transaction(&state.store, id))
        .map(Json)
        .into_response()
}
