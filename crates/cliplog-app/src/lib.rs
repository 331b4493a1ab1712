//! cliplog - annotation and statistics tools for clip logs
//!
//! The `cliplog` binary is a thin command dispatcher over this crate:
//! - [`config`]: environment-driven settings
//! - [`jobs`]: batch jobs (backfill, audit, statistics, checksums, duplicates)
//! - [`annotate`]: interactive clip entry

pub mod annotate;
pub mod config;
pub mod error;
pub mod jobs;

pub use annotate::{AnnotateSummary, Annotation};
pub use config::AppConfig;
pub use error::{JobError, Result};
