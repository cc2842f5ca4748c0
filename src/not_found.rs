//! Responses for requests that do not match a route or a stored record.

use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

use crate::html::error_view;

/// The fallback route handler for unmatched routes.
pub async fn get_404_not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response()
}

/// The page to show when a dashboard page refers to a missing transaction.
pub fn get_404_not_found_page_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(
            error_view(
                "Not Found",
                "404",
                "Transaction not found",
                "It may have already been deleted.",
            )
            .into_string(),
        ),
    )
        .into_response()
}
