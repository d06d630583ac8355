//! JSON results handler.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::store::ResultStore;

/// Serializes the current store contents as a JSON array.
///
/// Serialization runs while the store lock is held, so the body is always a
/// consistent snapshot even while workers are appending.
pub async fn results_handler(State(store): State<ResultStore>) -> Response {
    let json = match store.with_records(|records| serde_json::to_string(records)) {
        Ok(json) => json,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialize results: {}", e),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        json,
    )
        .into_response()
}
