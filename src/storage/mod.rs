//! SQLite storage layer -- pool, schema, and the execution repository.

pub mod executions;
pub mod schema;

pub use self::executions::{ExecutionRepository, SqliteExecutionRepository, StoredRow};

use anyhow::{Context, Result};
use r2d2::Pool as R2D2Pool;
use r2d2_sqlite::SqliteConnectionManager;
use thiserror::Error;

use crate::config::DatabaseConfig;

/// Connection Pool type
pub type Pool = R2D2Pool<SqliteConnectionManager>;

/// Anything that keeps the store from handing back its rows.
#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("database pool unavailable: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("repository task aborted: {0}")]
    Aborted(String),
}

/// Open the SQLite database and return a connection pool.
///
/// The `ExecutionSummary` table is created if the file does not have one yet.
pub fn open_pool(config: &DatabaseConfig) -> Result<Pool> {
    if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let busy_timeout = config.busy_timeout_ms;
    let manager = SqliteConnectionManager::file(&config.path).with_init(move |c| {
        c.execute_batch(&format!(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA busy_timeout = {busy_timeout};"
        ))
    });

    let pool = R2D2Pool::builder()
        .max_size(config.pool_size)
        .build(manager)
        .with_context(|| format!("failed to open database {}", config.path.display()))?;

    let conn = pool.get()?;
    schema::migrate(&conn)?;

    Ok(pool)
}
