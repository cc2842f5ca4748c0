//! Defines the endpoint for deleting a transaction.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::transaction::{
    service::delete_transaction,
    state::{TransactionState, parse_transaction_id},
};

/// A route handler for deleting a transaction, responds with a confirmation message.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
) -> Response {
    parse_transaction_id(&transaction_id)
        .and_then(|id| delete_transaction(&state.store, id))
        .map(|()| Json(json!({ "message": "Deleted successfully" })))
        .into_response()
}
