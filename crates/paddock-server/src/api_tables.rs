//! Fixed table-listing endpoints.
//!
//! Each route runs `SELECT *` over one compile-time constant table name.
//! Request input — path, query string, body — never reaches the SQL.

use crate::api::ApiError;
use crate::AppState;
use axum::extract::{Extension, Json};
use paddock_types::Envelope;
use std::sync::Arc;

async fn fetch_all(state: Arc<AppState>, table: &'static str) -> Result<Json<Envelope>, ApiError> {
    let outcome = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::Execution(format!("db connection failed: {e}")))?;
        paddock_db::fetch_all(&conn, table).map_err(|e| {
            tracing::error!(table, error = %e, "failed to fetch table");
            ApiError::Execution(format!("Failed to fetch {table}"))
        })
    })
    .await
    .map_err(|e| ApiError::Execution(format!("task join error: {e}")))??;

    Ok(Json(Envelope::success(outcome.results, outcome.rows)))
}

/// Handler for `GET /horses`.
pub async fn list_horses_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Envelope>, ApiError> {
    fetch_all(state, "Horse").await
}

/// Handler for `GET /owners`.
pub async fn list_owners_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Envelope>, ApiError> {
    fetch_all(state, "Owner").await
}

/// Handler for `GET /owns`.
pub async fn list_ownerships_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Envelope>, ApiError> {
    fetch_all(state, "Owns").await
}

/// Handler for `GET /stables`.
pub async fn list_stables_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Envelope>, ApiError> {
    fetch_all(state, "Stable").await
}

/// Handler for `GET /trainers`.
pub async fn list_trainers_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Envelope>, ApiError> {
    fetch_all(state, "Trainer").await
}

/// Handler for `GET /races`.
pub async fn list_races_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Envelope>, ApiError> {
    fetch_all(state, "Race").await
}

/// Handler for `GET /race-results`.
pub async fn list_race_results_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Envelope>, ApiError> {
    fetch_all(state, "RaceResults").await
}

/// Handler for `GET /tracks`.
pub async fn list_tracks_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Envelope>, ApiError> {
    fetch_all(state, "Track").await
}
