//! Error type for the batch jobs.

use cliplog_core::{ClipLogError, InvalidDuration};
use cliplog_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] ClipLogError),

    /// Statistics were refused because some durations do not parse.
    #[error("{} clip(s) have unusable durations", .0.len())]
    InvalidDurations(Vec<InvalidDuration>),

    #[error("Video {0} is already edited")]
    AlreadyEdited(String),
}

impl From<sqlx::Error> for JobError {
    fn from(e: sqlx::Error) -> Self {
        Self::Store(StoreError::Database(e))
    }
}

pub type Result<T> = std::result::Result<T, JobError>;
