//! Paddock server library logic.
//!
//! The HTTP surface is tiny: one dynamic SQL execution route (`GET`/`POST /`)
//! and a handful of fixed `SELECT *` listing routes, all speaking the JSON
//! envelope from `paddock-types`. Handlers receive the database pool through
//! shared application state injected into the router — never through process
//! globals.

pub mod api;
pub mod api_tables;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::get,
    Extension, Json, Router,
};
use paddock_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Maximum request body size (10 KiB). A `{query}` payload has no business
/// being larger than this.
const MAX_REQUEST_BODY_BYTES: usize = 10 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Initializes the tracing subscriber from logging configuration.
pub fn init_tracing(logging: &config::LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    app_with_static(state, None)
}

/// Builds the application router, optionally serving static console pages
/// (and their `queries.json`) as a fallback when the directory exists.
pub fn app_with_static(state: AppState, static_dir: Option<&str>) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route(
            "/",
            get(api::execute_handler).post(api::execute_handler),
        )
        .route("/horses", get(api_tables::list_horses_handler))
        .route("/owners", get(api_tables::list_owners_handler))
        .route("/owns", get(api_tables::list_ownerships_handler))
        .route("/stables", get(api_tables::list_stables_handler))
        .route("/trainers", get(api_tables::list_trainers_handler))
        .route("/races", get(api_tables::list_races_handler))
        .route("/race-results", get(api_tables::list_race_results_handler))
        .route("/tracks", get(api_tables::list_tracks_handler));

    let router = match static_dir {
        Some(dir) if std::path::Path::new(dir).exists() => {
            tracing::info!(path = %dir, "serving console static files");
            router.fallback_service(ServeDir::new(dir))
        }
        Some(dir) => {
            tracing::info!(path = %dir, "static directory not found, skipping static file serving");
            router
        }
        None => router,
    };

    router
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(Extension(Arc::new(state)))
}
