//! Database layer for the Paddock racing-database backend.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! embedded migrations for the racing schema, and the dynamic-SQL execution
//! helpers used by the HTTP handlers. The execution helpers deliberately run
//! whatever SQL text they are handed — that is the whole contract of the
//! backend — and only translate the outcome into JSON rows.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: no external database process required. WAL
//!   allows concurrent readers with a single writer, which matches the
//!   read-heavy listing endpoints.
//! - **`r2d2` connection pool**: bounded connection reuse without manual
//!   lifetime management. Each request draws its own connection; nothing is
//!   serialized or deduplicated above the pool.
//! - **Embedded migrations**: schema SQL is compiled into the binary via
//!   `include_str!`, so the schema ships with the server and cannot drift
//!   from the code that depends on it.

mod exec;
mod migrations;
mod pool;

pub use exec::{execute_sql, fetch_all, ExecOutcome};
pub use migrations::{run_migrations, MigrationError};
pub use pool::{open_pool, DbPool, PoolError, PoolSettings};
