//! Defines the endpoint for partially updating a transaction.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::{
    Error,
    transaction::{
        service::update_transaction,
        state::{TransactionState, parse_transaction_id},
    },
};

/// A route handler for updating any subset of a transaction's editable
/// fields, responds with the updated transaction.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let id = match parse_transaction_id(&transaction_id) {
        Ok(id) => id,
        Err(error) => return error.into_response(),
    };

    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    update_transaction(&state.store, id, &payload)
        .map(Json)
        .into_response()
}
