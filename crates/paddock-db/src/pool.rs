//! SQLite connection pooling.
//!
//! The server opens one pool at startup and hands it to every request
//! handler; each pooled connection is configured identically the moment the
//! pool opens it.

use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;

/// How the pool opens its database: where the file lives, how patient a
/// connection is when the database is locked, and how wide the pool grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Path to the SQLite database file. `:memory:` works, but every pooled
    /// connection then sees its own private database.
    pub path: String,

    /// How long a connection waits on a locked database before giving up,
    /// in milliseconds.
    pub busy_timeout_ms: u64,

    /// Upper bound on concurrently open connections.
    pub max_connections: u32,
}

impl PoolSettings {
    /// Settings for the given database path with the default timeout and
    /// pool width.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: 5_000,
            max_connections: 10,
        }
    }
}

/// A type alias for the SQLite connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Failure to open the connection pool.
#[derive(Debug, Error)]
#[error("failed to open connection pool for {path}: {source}")]
pub struct PoolError {
    path: String,
    #[source]
    source: r2d2::Error,
}

/// Opens the connection pool for `settings.path`, creating the database
/// file if needed. Every connection the pool hands out has WAL journaling,
/// enforced foreign keys, and the configured busy timeout.
///
/// # Errors
///
/// Returns [`PoolError`] when the pool cannot open its initial connection.
pub fn open_pool(settings: &PoolSettings) -> Result<DbPool, PoolError> {
    let busy_timeout = Duration::from_millis(settings.busy_timeout_ms);

    let manager = SqliteConnectionManager::file(&settings.path)
        .with_flags(
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )
        .with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            conn.pragma_update(None, "foreign_keys", "ON")?;

            // journal_mode reports the mode it settled on; in-memory
            // databases stay in "memory" mode, which is fine.
            let mode: String =
                conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
            if mode != "wal" && mode != "memory" {
                tracing::warn!(%mode, "database did not accept WAL journaling");
            }
            Ok(())
        });

    Pool::builder()
        .max_size(settings.max_connections)
        .build(manager)
        .map_err(|source| PoolError {
            path: settings.path.clone(),
            source,
        })
}
