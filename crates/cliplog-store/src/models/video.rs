//! Video row model and DTOs.
//!
//! Maps to the `videos` table.

use chrono::NaiveDate;
use cliplog_core::{RecordId, Video};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VideoRow {
    pub id: RecordId,
    pub filename: String,
    pub checksum: Option<String>,
    pub comment: Option<String>,
    pub edited: bool,
    pub produced: bool,
    pub created_date: Option<NaiveDate>,
    pub produced_date: Option<NaiveDate>,
}

impl From<VideoRow> for Video {
    fn from(row: VideoRow) -> Self {
        Video {
            id: row.id,
            filename: row.filename,
            checksum: row.checksum,
            comment: row.comment,
            edited: row.edited,
            produced: row.produced,
            created_date: row.created_date,
            produced_date: row.produced_date,
        }
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// DTO for inserting a new video.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideo {
    pub filename: String,
    pub comment: Option<String>,
    pub created_date: NaiveDate,
}
