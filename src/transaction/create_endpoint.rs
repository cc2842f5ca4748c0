//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::{
    Error,
    transaction::{service::create_transaction, state::TransactionState},
};

/// A route handler for creating a new transaction, responds with the stored
/// transaction and 201 Created.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    match create_transaction(&state.store, &payload) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => error.into_response(),
    }
}
