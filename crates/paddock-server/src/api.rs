//! The dynamic SQL execution endpoint.

use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use paddock_types::{Envelope, ExecuteRequest};
use std::sync::Arc;
use thiserror::Error;

/// API error type mapping onto the response envelope.
///
/// `BadRequest` becomes a 400 `fail` envelope (the caller's fault),
/// `Execution` becomes a 500 `error` envelope (the statement blew up).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Execution(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Envelope::fail(msg)),
            ApiError::Execution(msg) => (StatusCode::INTERNAL_SERVER_ERROR, Envelope::error(msg)),
        };
        (status, Json(envelope)).into_response()
    }
}

/// Handler for `GET`/`POST /` — executes an arbitrary SQL string.
///
/// The body extractor is a `Result` so that a missing or non-JSON body (a
/// bare `GET /`, for instance) lands in the same 400 `fail` envelope as a
/// JSON body without a `query` property, instead of axum's default plain-text
/// rejection.
///
/// No statement-type restriction is applied: `SELECT`, `INSERT`, DDL and
/// multi-statement batches all go straight to the database. Concurrent
/// requests are not deduplicated or serialized — each draws its own pooled
/// connection and races at the database's native isolation level.
pub async fn execute_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let query = match body {
        Ok(Json(request)) => request.query.unwrap_or_default(),
        Err(_) => String::new(),
    };
    let query = query.trim().to_string();

    if query.is_empty() {
        return Err(ApiError::BadRequest(
            "Request body must include a `query` property.".to_string(),
        ));
    }

    tracing::info!(%query, "executing root query");

    let outcome = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::Execution(format!("db connection failed: {e}")))?;
        paddock_db::execute_sql(&conn, &query).map_err(|e| {
            tracing::error!(error = %e, "failed to execute custom query");
            ApiError::Execution(e.to_string())
        })
    })
    .await
    .map_err(|e| ApiError::Execution(format!("task join error: {e}")))??;

    Ok(Json(Envelope::success(outcome.results, outcome.rows)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_maps_to_envelope_statuses() {
        let response = ApiError::BadRequest("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Execution("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
