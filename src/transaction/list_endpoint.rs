//! Defines the endpoint for listing, filtering and summarizing transactions.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Query since that parses an empty value as None.
use axum_extra::extract::Query;

use crate::transaction::{
    list::{ListQuery, list_transactions},
    state::TransactionState,
};

/// A route handler for listing transactions, responds with
/// `{page, limit, total, items, summary}`.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Query(query): Query<ListQuery>,
) -> Response {
    list_transactions(&state.store, &query, &state.pagination_config)
        .map(Json)
        .into_response()
}
