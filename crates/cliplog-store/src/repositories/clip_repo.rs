//! Repository for the `clips` table.

use cliplog_core::{DerivedFields, NewClip, RecordId};
use sqlx::{Executor, Sqlite, SqliteConnection};

use crate::error::{Result, StoreError};
use crate::models::clip::ClipRow;
use crate::repositories::VideoRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, video_id, start_time, duration, activity, mag, start_frame, duration_seconds";

/// Provides clip inserts, listings and derived-field maintenance.
pub struct ClipRepo;

impl ClipRepo {
    /// Attach a clip to a video.
    ///
    /// Derived fields are computed from the strings before anything is
    /// written; the clip insert and the video's `edited` flag share the
    /// caller's connection, so run this inside a transaction to make the
    /// pair atomic.
    pub async fn create(
        conn: &mut SqliteConnection,
        video_id: RecordId,
        clip: &NewClip,
    ) -> Result<ClipRow> {
        let derived = clip.derive()?;

        if !VideoRepo::mark_edited(&mut *conn, video_id).await? {
            return Err(StoreError::VideoNotFound(video_id));
        }

        let query = format!(
            "INSERT INTO clips
                (video_id, start_time, duration, activity, mag, start_frame, duration_seconds)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ClipRow>(&query)
            .bind(video_id)
            .bind(&clip.start_time)
            .bind(&clip.duration)
            .bind(&clip.activity)
            .bind(clip.mag)
            .bind(derived.start_frame)
            .bind(derived.duration_seconds)
            .fetch_one(&mut *conn)
            .await?;

        tracing::debug!(clip_id = row.id, video_id, start_time = %row.start_time, "Clip attached");
        Ok(row)
    }

    /// Clips of one video in entry order.
    pub async fn list_for_video<'e, E>(
        executor: E,
        video_id: RecordId,
    ) -> std::result::Result<Vec<ClipRow>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {COLUMNS} FROM clips WHERE video_id = ?1 ORDER BY id");
        sqlx::query_as::<_, ClipRow>(&query)
            .bind(video_id)
            .fetch_all(executor)
            .await
    }

    /// Every clip, ordered by ID.
    pub async fn list_all<'e, E>(executor: E) -> std::result::Result<Vec<ClipRow>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {COLUMNS} FROM clips ORDER BY id");
        sqlx::query_as::<_, ClipRow>(&query).fetch_all(executor).await
    }

    /// Clips missing either derived column.
    pub async fn list_missing_derived<'e, E>(
        executor: E,
    ) -> std::result::Result<Vec<ClipRow>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM clips
             WHERE start_frame IS NULL OR duration_seconds IS NULL
             ORDER BY id"
        );
        sqlx::query_as::<_, ClipRow>(&query).fetch_all(executor).await
    }

    /// Store both derived columns of a clip.
    pub async fn update_derived<'e, E>(
        executor: E,
        id: RecordId,
        derived: &DerivedFields,
    ) -> std::result::Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE clips SET start_frame = ?2, duration_seconds = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(derived.start_frame)
        .bind(derived.duration_seconds)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Activity codes in use, sorted.
    pub async fn distinct_activities<'e, E>(
        executor: E,
    ) -> std::result::Result<Vec<String>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT activity FROM clips ORDER BY activity")
            .fetch_all(executor)
            .await
    }
}
