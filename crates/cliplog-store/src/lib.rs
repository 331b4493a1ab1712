//! cliplog store - SQLite persistence
//!
//! Schema migrations live in `migrations/` and are embedded at compile
//! time. Repositories are zero-sized structs with async methods; see
//! [`repositories`].

pub mod error;
pub mod models;
pub mod repositories;
pub mod retry;

use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub use error::{is_busy, Result, StoreError};
pub use models::clip::ClipRow;
pub use models::video::{CreateVideo, VideoRow};
pub use repositories::{ClipRepo, VideoRepo};
pub use retry::retry_busy;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Open (creating if needed) the database at `url` and bring its schema up
/// to date.
///
/// A single connection is used: the tools run one statement at a time and
/// SQLite serializes writers anyway.
pub async fn connect(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    MIGRATOR.run(&pool).await?;
    tracing::info!(url, "Database ready");
    Ok(pool)
}

/// A migrated private in-memory database.
///
/// The pool holds exactly one connection that never expires, since each
/// in-memory connection is its own database.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    connect_in_memory().await.expect("in-memory database")
}
