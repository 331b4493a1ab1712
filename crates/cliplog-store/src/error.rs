//! Error type for the persistence layer.

use cliplog_core::{RecordId, TimecodeError};
use thiserror::Error;

/// SQLite primary result codes for a locked database.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Timecode(#[from] TimecodeError),

    #[error("Video not found: {0}")]
    VideoNotFound(RecordId),
}

impl StoreError {
    /// True when another connection holds the lock; the statement can be
    /// retried as-is.
    pub fn is_busy(&self) -> bool {
        match self {
            Self::Database(e) => is_busy(e),
            _ => false,
        }
    }
}

/// Busy/locked check on a raw driver error. Extended result codes keep the
/// primary code in the low byte.
pub fn is_busy(error: &sqlx::Error) -> bool {
    let sqlx::Error::Database(db) = error else {
        return false;
    };
    db.code()
        .and_then(|code| code.parse::<i32>().ok())
        .map(|code| code & 0xff)
        .is_some_and(|code| code == SQLITE_BUSY || code == SQLITE_LOCKED)
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
