//! Clip row model.
//!
//! Maps to the `clips` table. Inserts go through [`cliplog_core::NewClip`].

use cliplog_core::{Clip, DerivedFields, RecordId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `clips` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClipRow {
    pub id: RecordId,
    pub video_id: RecordId,
    pub start_time: String,
    pub duration: String,
    pub activity: String,
    pub mag: i64,
    pub start_frame: Option<i64>,
    pub duration_seconds: Option<f64>,
}

impl From<ClipRow> for Clip {
    fn from(row: ClipRow) -> Self {
        Clip {
            id: row.id,
            video_id: row.video_id,
            start_time: row.start_time,
            duration: row.duration,
            activity: row.activity,
            mag: row.mag,
            derived: DerivedFields::from_columns(row.start_frame, row.duration_seconds),
        }
    }
}
