//! Paddock server binary — the main entry point for the racing-database
//! admin backend.
//!
//! Starts an axum HTTP server with structured logging, database pool
//! initialization, a startup connectivity probe, and graceful shutdown on
//! SIGTERM/SIGINT. Any database initialization failure exits with status 1;
//! the server never starts without a working pool.

use paddock_server::{app_with_static, config, init_tracing, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("PADDOCK_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    let config = match config::load_config(selected_config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging);

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    let pool = match paddock_db::open_pool(&paddock_db::PoolSettings {
        path: config.database.path.clone(),
        busy_timeout_ms: config.database.busy_timeout_ms,
        max_connections: config.database.pool_max_size,
    }) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "failed to create database pool");
            std::process::exit(1);
        }
    };

    // Migrations plus a connectivity probe before the listener binds; the
    // process refuses to serve without a reachable database.
    {
        let conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!(error = %e, "failed to get database connection");
                std::process::exit(1);
            }
        };
        match paddock_db::run_migrations(&conn) {
            Ok(applied) if applied > 0 => {
                tracing::info!(count = applied, "applied database migrations");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "failed to run database migrations");
                std::process::exit(1);
            }
        }
        if let Err(e) = conn.query_row("SELECT 1", [], |_| Ok(())) {
            tracing::error!(error = %e, "database connectivity check failed");
            std::process::exit(1);
        }
        tracing::info!(path = %config.database.path, "connected to database");
    }

    let app = app_with_static(AppState { pool }, Some(&config.server.static_dir));
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, "starting paddock server");

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind to address");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }

    tracing::info!("paddock server shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
